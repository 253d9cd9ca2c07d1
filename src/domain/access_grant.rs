use crate::domain::company::Company;
use crate::domain::permission_module::{PERMISSION_MODULES, PermissionModule};
use crate::domain::role::CompanyRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Role id given to a freshly added grant.
pub const DEFAULT_ROLE_ID: u8 = 4;
/// Role name given to a freshly added grant.
pub const DEFAULT_ROLE_NAME: &str = "Employee";

/// AccessGrant entity: one company's role and permission assignment for the
/// user being edited.
///
/// A module missing from `module_permissions` holds no permissions, exactly like
/// a module mapped to an empty list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessGrant {
    pub company_id: i64,
    /// Snapshot of the company name taken when the grant was added.
    pub company_name: String,
    pub role_id: u8,
    pub role_name: String,
    #[serde(default)]
    pub module_permissions: BTreeMap<String, Vec<String>>,
}

impl AccessGrant {
    /// Creates the default grant for a company: Employee name, role id 4, no permissions.
    pub fn for_company(company: &Company) -> Self {
        Self {
            company_id: company.id,
            company_name: company.name.clone(),
            role_id: DEFAULT_ROLE_ID,
            role_name: DEFAULT_ROLE_NAME.to_string(),
            module_permissions: BTreeMap::new(),
        }
    }

    /// Builder-style helper to set a role on construction.
    pub fn with_role(mut self, role_name: &str) -> Self {
        self.set_role(role_name);
        self
    }

    /// Builder-style helper to set one module's permission list on construction.
    pub fn with_permissions(mut self, module_id: &str, permissions: &[&str]) -> Self {
        self.module_permissions.insert(
            module_id.to_string(),
            permissions.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    /// Sets the role name and derives the role id from it.
    pub fn set_role(&mut self, role_name: &str) {
        let role = CompanyRole::from_name(role_name);
        self.role_id = role.role_id();
        self.role_name = role.name().to_string();
    }

    /// Permissions held for a module; empty when the module has no entry.
    pub fn permissions_for(&self, module_id: &str) -> &[String] {
        self.module_permissions
            .get(module_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_permission(&self, module_id: &str, permission: &str) -> bool {
        self.permissions_for(module_id).iter().any(|p| p == permission)
    }

    /// Removes the permission if held, adds it otherwise.
    pub fn toggle_permission(&mut self, module_id: &str, permission: &str) {
        let permissions = self
            .module_permissions
            .entry(module_id.to_string())
            .or_default();
        if let Some(pos) = permissions.iter().position(|p| p == permission) {
            permissions.remove(pos);
        } else {
            permissions.push(permission.to_string());
        }
    }

    /// Overwrites every catalog module with its full list, or with an empty list.
    pub fn set_all_permissions(&mut self, checked: bool) {
        for module in PERMISSION_MODULES.iter() {
            self.fill_module(module, checked);
        }
    }

    /// Overwrites one catalog module. Returns false for a module id outside the catalog.
    pub fn set_module_permissions(&mut self, module_id: &str, checked: bool) -> bool {
        match PermissionModule::find(module_id) {
            Some(module) => {
                self.fill_module(module, checked);
                true
            }
            None => false,
        }
    }

    /// Total number of permission entries across all modules of this grant.
    pub fn permission_count(&self) -> usize {
        self.module_permissions.values().map(Vec::len).sum()
    }

    fn fill_module(&mut self, module: &PermissionModule, checked: bool) {
        let permissions = if checked {
            module.all_permissions()
        } else {
            Vec::new()
        };
        self.module_permissions
            .insert(module.id.to_string(), permissions);
    }
}

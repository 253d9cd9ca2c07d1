use crate::application::commands::AccessCommand;
use crate::domain::access_grant::AccessGrant;
use crate::domain::company::Company;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Soft failures of draft operations. The display text is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessMatrixError {
    #[error("Please select a company")]
    NoCompanySelected,
    #[error("Company already added")]
    CompanyAlreadyAdded(i64),
    #[error("Company not found")]
    UnknownCompany(i64),
}

/// Host-supplied sink for validation failures.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

impl<F> ErrorSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Read model of a draft, handed to the host on every render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccessDraftSnapshot {
    pub grants: Vec<AccessGrant>,
    pub selected_company_id: Option<i64>,
    pub available_companies: Vec<Company>,
    pub total_permission_count: usize,
    pub unique_role_count: usize,
}

/// Editable draft of one user's per-company access grants.
///
/// `add_selected_company` rejects a company that already has a grant. Lists
/// passed to `new` and `reinitialize` are taken as given, so the caller must
/// check them first (see `InitialGrantsValidator`). Operations addressing a
/// company without a grant do nothing.
pub struct AccessMatrixStore {
    companies: Vec<Company>,
    grants: Vec<AccessGrant>,
    initial_grants: Vec<AccessGrant>,
    selected_company_id: Option<i64>,
    on_error: Box<dyn ErrorSink>,
}

impl fmt::Debug for AccessMatrixStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessMatrixStore")
            .field("companies", &self.companies)
            .field("grants", &self.grants)
            .field("initial_grants", &self.initial_grants)
            .field("selected_company_id", &self.selected_company_id)
            .finish_non_exhaustive()
    }
}

impl AccessMatrixStore {
    /// Creates a store over the tenant's companies, seeded with `initial_grants`.
    pub fn new(
        companies: Vec<Company>,
        initial_grants: Option<Vec<AccessGrant>>,
        on_error: impl ErrorSink + 'static,
    ) -> Self {
        let initial_grants = initial_grants.unwrap_or_default();
        Self {
            companies,
            grants: initial_grants.clone(),
            initial_grants,
            selected_company_id: None,
            on_error: Box::new(on_error),
        }
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Current draft grants in insertion order.
    pub fn grants(&self) -> &[AccessGrant] {
        &self.grants
    }

    pub fn grant(&self, company_id: i64) -> Option<&AccessGrant> {
        self.grants.iter().find(|g| g.company_id == company_id)
    }

    pub fn selected_company_id(&self) -> Option<i64> {
        self.selected_company_id
    }

    /// The snapshot `reset` restores.
    pub fn initial_grants(&self) -> &[AccessGrant] {
        &self.initial_grants
    }

    /// Replaces the draft and the reset target with a freshly loaded grant list.
    ///
    /// An empty list cannot be told apart from "not loaded yet" and is ignored.
    pub fn reinitialize(&mut self, grants: Vec<AccessGrant>) {
        if grants.is_empty() {
            tracing::debug!("Ignoring empty initial grant list");
            return;
        }
        tracing::debug!(grants = grants.len(), "Reinitializing access draft");
        self.grants = grants.clone();
        self.initial_grants = grants;
    }

    pub fn select_company(&mut self, company_id: i64) {
        self.selected_company_id = Some(company_id);
    }

    /// Commits the selected company as a new default grant.
    pub fn add_selected_company(&mut self) -> Result<&AccessGrant, AccessMatrixError> {
        let company = match self.validate_selection() {
            Ok(company) => company,
            Err(err) => {
                tracing::debug!(error = %err, "Rejected company access addition");
                self.on_error.report(&err.to_string());
                return Err(err);
            }
        };
        let grant = AccessGrant::for_company(&company);
        tracing::debug!(company_id = grant.company_id, "Company added to access draft");
        self.grants.push(grant);
        self.selected_company_id = None;
        Ok(&self.grants[self.grants.len() - 1])
    }

    /// Removes the grant for a company. Returns whether one was removed.
    pub fn remove_company(&mut self, company_id: i64) -> bool {
        let before = self.grants.len();
        self.grants.retain(|g| g.company_id != company_id);
        before != self.grants.len()
    }

    pub fn set_role(&mut self, company_id: i64, role_name: &str) -> bool {
        self.update_grant(company_id, |grant| grant.set_role(role_name))
    }

    pub fn toggle_permission(
        &mut self,
        company_id: i64,
        module_id: &str,
        permission: &str,
    ) -> bool {
        self.update_grant(company_id, |grant| {
            grant.toggle_permission(module_id, permission)
        })
    }

    pub fn set_all_permissions(&mut self, company_id: i64, checked: bool) -> bool {
        self.update_grant(company_id, |grant| grant.set_all_permissions(checked))
    }

    /// Sets one module to all or nothing. Unknown modules leave the grant untouched.
    pub fn set_module_permissions(
        &mut self,
        company_id: i64,
        module_id: &str,
        checked: bool,
    ) -> bool {
        match self.grants.iter_mut().find(|g| g.company_id == company_id) {
            Some(grant) => grant.set_module_permissions(module_id, checked),
            None => {
                tracing::debug!(company_id, "No grant for company; ignoring");
                false
            }
        }
    }

    /// Sum of permission entries across all grants.
    pub fn total_permission_count(&self) -> usize {
        self.grants.iter().map(AccessGrant::permission_count).sum()
    }

    /// Number of distinct role names across all grants.
    pub fn unique_role_count(&self) -> usize {
        self.grants
            .iter()
            .map(|g| g.role_name.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Companies that do not have a grant yet, in reference order.
    pub fn available_companies(&self) -> Vec<&Company> {
        self.companies
            .iter()
            .filter(|c| !self.has_grant(c.id))
            .collect()
    }

    /// Restores the last loaded grant list and clears the selection.
    pub fn reset(&mut self) {
        self.grants = self.initial_grants.clone();
        self.selected_company_id = None;
    }

    /// Applies one command. Only `AddSelectedCompany` can fail.
    pub fn apply(&mut self, command: AccessCommand) -> Result<(), AccessMatrixError> {
        match command {
            AccessCommand::SelectCompany { company_id } => self.select_company(company_id),
            AccessCommand::AddSelectedCompany => {
                self.add_selected_company()?;
            }
            AccessCommand::RemoveCompany { company_id } => {
                self.remove_company(company_id);
            }
            AccessCommand::SetRole {
                company_id,
                role_name,
            } => {
                self.set_role(company_id, &role_name);
            }
            AccessCommand::TogglePermission {
                company_id,
                module_id,
                permission,
            } => {
                self.toggle_permission(company_id, &module_id, &permission);
            }
            AccessCommand::SetAllPermissions {
                company_id,
                checked,
            } => {
                self.set_all_permissions(company_id, checked);
            }
            AccessCommand::SetModulePermissions {
                company_id,
                module_id,
                checked,
            } => {
                self.set_module_permissions(company_id, &module_id, checked);
            }
            AccessCommand::Reinitialize { grants } => self.reinitialize(grants),
            AccessCommand::Reset => self.reset(),
        }
        Ok(())
    }

    pub fn snapshot(&self) -> AccessDraftSnapshot {
        AccessDraftSnapshot {
            grants: self.grants.clone(),
            selected_company_id: self.selected_company_id,
            available_companies: self.available_companies().into_iter().cloned().collect(),
            total_permission_count: self.total_permission_count(),
            unique_role_count: self.unique_role_count(),
        }
    }

    fn has_grant(&self, company_id: i64) -> bool {
        self.grants.iter().any(|g| g.company_id == company_id)
    }

    fn validate_selection(&self) -> Result<Company, AccessMatrixError> {
        let company_id = self
            .selected_company_id
            .ok_or(AccessMatrixError::NoCompanySelected)?;
        if self.has_grant(company_id) {
            return Err(AccessMatrixError::CompanyAlreadyAdded(company_id));
        }
        self.companies
            .iter()
            .find(|c| c.id == company_id)
            .cloned()
            .ok_or(AccessMatrixError::UnknownCompany(company_id))
    }

    fn update_grant(&mut self, company_id: i64, f: impl FnOnce(&mut AccessGrant)) -> bool {
        match self.grants.iter_mut().find(|g| g.company_id == company_id) {
            Some(grant) => {
                f(grant);
                true
            }
            None => {
                tracing::debug!(company_id, "No grant for company; ignoring");
                false
            }
        }
    }
}

/// Permission kinds offered by every module, in display order.
pub const PERMISSION_KINDS: [&str; 4] = ["View", "Add", "Edit", "Delete"];

/// PermissionModule: a functional ERP area with its own CRUD permission set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionModule {
    pub id: &'static str,
    pub name: &'static str,
    pub permissions: &'static [&'static str],
}

/// The fixed module catalog. Never mutated.
pub static PERMISSION_MODULES: [PermissionModule; 4] = [
    PermissionModule {
        id: "sales",
        name: "Sales",
        permissions: &PERMISSION_KINDS,
    },
    PermissionModule {
        id: "purchase",
        name: "Purchase",
        permissions: &PERMISSION_KINDS,
    },
    PermissionModule {
        id: "finance",
        name: "Finance",
        permissions: &PERMISSION_KINDS,
    },
    PermissionModule {
        id: "inventory",
        name: "Inventory",
        permissions: &PERMISSION_KINDS,
    },
];

impl PermissionModule {
    /// Looks up a catalog module by id.
    pub fn find(module_id: &str) -> Option<&'static PermissionModule> {
        PERMISSION_MODULES.iter().find(|m| m.id == module_id)
    }

    /// Returns the module's full permission list as owned strings.
    pub fn all_permissions(&self) -> Vec<String> {
        self.permissions.iter().map(|p| p.to_string()).collect()
    }
}

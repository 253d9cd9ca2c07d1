use std::fmt;

/// Role a user holds within one company.
///
/// Known names map to fixed ids; any other name is kept verbatim and maps to 4.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompanyRole {
    Admin,
    Manager,
    Employee,
    Other(String),
}

impl CompanyRole {
    /// Role id used for names outside the known set.
    pub const OTHER_ID: u8 = 4;

    /// Parses a role from its display name. Matching is exact.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Admin" => CompanyRole::Admin,
            "Manager" => CompanyRole::Manager,
            "Employee" => CompanyRole::Employee,
            other => CompanyRole::Other(other.to_string()),
        }
    }

    /// Numeric role id sent to the backend.
    pub fn role_id(&self) -> u8 {
        match self {
            CompanyRole::Admin => 1,
            CompanyRole::Manager => 2,
            CompanyRole::Employee => 3,
            CompanyRole::Other(_) => Self::OTHER_ID,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CompanyRole::Admin => "Admin",
            CompanyRole::Manager => "Manager",
            CompanyRole::Employee => "Employee",
            CompanyRole::Other(name) => name.as_str(),
        }
    }
}

impl fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_role_ids() {
        assert_eq!(CompanyRole::from_name("Admin").role_id(), 1);
        assert_eq!(CompanyRole::from_name("Manager").role_id(), 2);
        assert_eq!(CompanyRole::from_name("Employee").role_id(), 3);
    }

    #[test]
    fn test_unknown_role_keeps_name() {
        let role = CompanyRole::from_name("Viewer");
        assert_eq!(role, CompanyRole::Other("Viewer".to_string()));
        assert_eq!(role.role_id(), 4);
        assert_eq!(role.name(), "Viewer");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(CompanyRole::from_name("admin").role_id(), 4);
    }

    #[test]
    fn test_display_round_trips_name() {
        for name in ["Admin", "Manager", "Employee", "Auditor"] {
            assert_eq!(CompanyRole::from_name(name).to_string(), name);
        }
    }
}

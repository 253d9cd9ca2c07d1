use crate::domain::access_grant::AccessGrant;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One user interaction against an access draft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessCommand {
    /// Pick a company in the "add company" selector
    SelectCompany { company_id: i64 },
    /// Commit the selected company as a new grant
    AddSelectedCompany,
    RemoveCompany {
        company_id: i64,
    },
    SetRole {
        company_id: i64,
        role_name: String,
    },
    TogglePermission {
        company_id: i64,
        module_id: String,
        permission: String,
    },
    SetAllPermissions {
        company_id: i64,
        checked: bool,
    },
    SetModulePermissions {
        company_id: i64,
        module_id: String,
        checked: bool,
    },
    /// Replace the draft with a freshly loaded grant list (ignored when empty)
    Reinitialize { grants: Vec<AccessGrant> },
    /// Discard edits and return to the last loaded grant list
    Reset,
}

impl AccessCommand {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AccessCommand::SelectCompany { .. } => "select_company",
            AccessCommand::AddSelectedCompany => "add_selected_company",
            AccessCommand::RemoveCompany { .. } => "remove_company",
            AccessCommand::SetRole { .. } => "set_role",
            AccessCommand::TogglePermission { .. } => "toggle_permission",
            AccessCommand::SetAllPermissions { .. } => "set_all_permissions",
            AccessCommand::SetModulePermissions { .. } => "set_module_permissions",
            AccessCommand::Reinitialize { .. } => "reinitialize",
            AccessCommand::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_tagged_command() {
        let cmd: AccessCommand = serde_json::from_value(json!({
            "type": "toggle_permission",
            "company_id": 1,
            "module_id": "sales",
            "permission": "Edit"
        }))
        .unwrap();
        assert_eq!(
            cmd,
            AccessCommand::TogglePermission {
                company_id: 1,
                module_id: "sales".to_string(),
                permission: "Edit".to_string(),
            }
        );
        assert_eq!(cmd.kind(), "toggle_permission");
    }

    #[test]
    fn test_deserialize_unit_command() {
        let cmd: AccessCommand = serde_json::from_value(json!({ "type": "reset" })).unwrap();
        assert_eq!(cmd, AccessCommand::Reset);
    }

    #[test]
    fn test_unknown_command_type_is_rejected() {
        let result: Result<AccessCommand, _> =
            serde_json::from_value(json!({ "type": "grant_everything" }));
        assert!(result.is_err());
    }
}

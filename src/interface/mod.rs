// Interface layer: HTTP API, DTOs

use crate::application::access_matrix::AccessDraftSnapshot;
use crate::domain::access_grant::AccessGrant;
use crate::domain::company::Company;
use crate::domain::permission_module::PermissionModule;
use crate::infrastructure::AccessDraftRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    pub name: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CompaniesListResponse {
    pub companies: Vec<Company>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PermissionModuleResponse {
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
}

impl From<&PermissionModule> for PermissionModuleResponse {
    fn from(module: &PermissionModule) -> Self {
        Self {
            id: module.id.to_string(),
            name: module.name.to_string(),
            permissions: module.all_permissions(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PermissionModulesResponse {
    pub modules: Vec<PermissionModuleResponse>,
}

#[derive(Default, Serialize, Deserialize, ToSchema)]
pub struct CreateAccessDraftRequest {
    /// Grants loaded for the user being edited; omit when creating a user
    #[serde(default)]
    pub initial_grants: Option<Vec<AccessGrant>>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AccessDraftResponse {
    pub draft_id: String,
    /// RFC 3339 timestamp
    pub opened_at: String,
    pub grants: Vec<AccessGrant>,
    pub selected_company_id: Option<i64>,
    pub available_companies: Vec<Company>,
    pub total_permission_count: usize,
    pub unique_role_count: usize,
}

impl From<AccessDraftRecord> for AccessDraftResponse {
    fn from(record: AccessDraftRecord) -> Self {
        let AccessDraftSnapshot {
            grants,
            selected_company_id,
            available_companies,
            total_permission_count,
            unique_role_count,
        } = record.snapshot;
        Self {
            draft_id: record.draft_id,
            opened_at: record.opened_at.to_rfc3339(),
            grants,
            selected_company_id,
            available_companies,
            total_permission_count,
            unique_role_count,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod app_state;
pub mod http_handlers;

pub use app_state::AppState;
pub use http_handlers::{
    apply_access_command_handler, create_access_draft_handler, create_company_handler,
    discard_access_draft_handler, get_access_draft_handler, list_companies_handler,
    list_permission_modules_handler,
};

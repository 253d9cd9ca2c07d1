use crate::application::commands::AccessCommand;
use crate::application::validators::{CompanyValidator, InitialGrantsValidator};
use crate::domain::permission_module::PERMISSION_MODULES;
use crate::infrastructure::RepositoryError;
use crate::interface::app_state::AppState;
use crate::interface::{
    AccessDraftResponse, CompaniesListResponse, CreateAccessDraftRequest, CreateCompanyRequest,
    ErrorResponse, PermissionModuleResponse, PermissionModulesResponse,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn repository_error_response(err: RepositoryError) -> Response {
    let status = match &err {
        RepositoryError::DraftNotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::Command(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RepositoryError::Validation(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, err.to_string())
}

// --- COMPANY DIRECTORY HANDLERS ---

#[axum::debug_handler]
#[utoipa::path(
    get,
    path = "/v1/companies",
    responses(
        (status = 200, description = "Companies available to the tenant", body = CompaniesListResponse),
    ),
    tags = ["Companies"],
    description = "List the tenant's company directory."
)]
pub async fn list_companies_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.company_repo.list_companies().await {
        Ok(companies) => Json(CompaniesListResponse { companies }).into_response(),
        Err(e) => repository_error_response(e),
    }
}

#[axum::debug_handler]
#[utoipa::path(
    post,
    path = "/v1/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company registered", body = crate::domain::company::Company),
        (status = 400, description = "Invalid company name", body = ErrorResponse),
    ),
    tags = ["Companies"],
    description = "Register a company in the tenant's directory."
)]
pub async fn create_company_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCompanyRequest>,
) -> impl IntoResponse {
    if let Err(e) = CompanyValidator::validate_name(&payload.name) {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }
    match state.company_repo.create_company(&payload.name).await {
        Ok(company) => (StatusCode::CREATED, Json(company)).into_response(),
        Err(e) => repository_error_response(e),
    }
}

#[axum::debug_handler]
#[utoipa::path(
    get,
    path = "/v1/permission-modules",
    responses(
        (status = 200, description = "Permission module catalog", body = PermissionModulesResponse),
    ),
    tags = ["Companies"],
    description = "List the modules and permission kinds a grant can hold."
)]
pub async fn list_permission_modules_handler() -> impl IntoResponse {
    Json(PermissionModulesResponse {
        modules: PERMISSION_MODULES
            .iter()
            .map(PermissionModuleResponse::from)
            .collect(),
    })
}

// --- ACCESS DRAFT HANDLERS ---

#[axum::debug_handler]
#[utoipa::path(
    post,
    path = "/v1/access-drafts",
    request_body = CreateAccessDraftRequest,
    responses(
        (status = 201, description = "Draft opened", body = AccessDraftResponse),
        (status = 400, description = "Initial grants rejected", body = ErrorResponse),
    ),
    tags = ["Access Drafts"],
    description = "Open an editable company access draft for one user."
)]
pub async fn create_access_draft_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAccessDraftRequest>,
) -> impl IntoResponse {
    let companies = match state.company_repo.list_companies().await {
        Ok(companies) => companies,
        Err(e) => return repository_error_response(e),
    };
    if let Some(grants) = &payload.initial_grants {
        if let Err(e) = InitialGrantsValidator::validate(&companies, grants) {
            tracing::warn!(error = %e, "Initial grants rejected");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    }
    match state
        .draft_repo
        .open_draft(companies, payload.initial_grants)
        .await
    {
        Ok(record) => (
            StatusCode::CREATED,
            Json(AccessDraftResponse::from(record)),
        )
            .into_response(),
        Err(e) => repository_error_response(e),
    }
}

#[axum::debug_handler]
#[utoipa::path(
    get,
    path = "/v1/access-drafts/{draft_id}",
    params(("draft_id" = String, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Current draft", body = AccessDraftResponse),
        (status = 404, description = "Draft not found", body = ErrorResponse),
    ),
    tags = ["Access Drafts"],
    description = "Read the draft's grants and derived totals."
)]
pub async fn get_access_draft_handler(
    State(state): State<Arc<AppState>>,
    Path(draft_id): Path<String>,
) -> impl IntoResponse {
    match state.draft_repo.get_draft(&draft_id).await {
        Ok(record) => Json(AccessDraftResponse::from(record)).into_response(),
        Err(e) => repository_error_response(e),
    }
}

#[axum::debug_handler]
#[utoipa::path(
    post,
    path = "/v1/access-drafts/{draft_id}/commands",
    params(("draft_id" = String, Path, description = "Draft id")),
    request_body = AccessCommand,
    responses(
        (status = 200, description = "Command applied", body = AccessDraftResponse),
        (status = 400, description = "Reloaded grants rejected", body = ErrorResponse),
        (status = 404, description = "Draft not found", body = ErrorResponse),
        (status = 422, description = "Command rejected", body = ErrorResponse),
    ),
    tags = ["Access Drafts"],
    description = "Apply one user interaction to the draft."
)]
pub async fn apply_access_command_handler(
    State(state): State<Arc<AppState>>,
    Path(draft_id): Path<String>,
    Json(command): Json<AccessCommand>,
) -> impl IntoResponse {
    match state.draft_repo.apply_command(&draft_id, command).await {
        Ok(record) => Json(AccessDraftResponse::from(record)).into_response(),
        Err(e) => repository_error_response(e),
    }
}

#[axum::debug_handler]
#[utoipa::path(
    delete,
    path = "/v1/access-drafts/{draft_id}",
    params(("draft_id" = String, Path, description = "Draft id")),
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 404, description = "Draft not found", body = ErrorResponse),
    ),
    tags = ["Access Drafts"],
    description = "Discard a draft without submitting it."
)]
pub async fn discard_access_draft_handler(
    State(state): State<Arc<AppState>>,
    Path(draft_id): Path<String>,
) -> impl IntoResponse {
    match state.draft_repo.discard_draft(&draft_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => repository_error_response(e),
    }
}

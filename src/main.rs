use axum::{
    Router,
    routing::{get, post},
};
use company_access_service::application::commands::AccessCommand;
use company_access_service::domain::access_grant::AccessGrant;
use company_access_service::domain::company::Company;
use company_access_service::interface::{
    // DTOs
    AccessDraftResponse,
    CompaniesListResponse,
    CreateAccessDraftRequest,
    CreateCompanyRequest,
    ErrorResponse,
    PermissionModuleResponse,
    PermissionModulesResponse,
    apply_access_command_handler,
    create_access_draft_handler,
    create_company_handler,
    discard_access_draft_handler,
    get_access_draft_handler,
    list_companies_handler,
    list_permission_modules_handler,
};
use company_access_service::{AppConfig, AppStateBuilder};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        company_access_service::interface::http_handlers::list_companies_handler,
        company_access_service::interface::http_handlers::create_company_handler,
        company_access_service::interface::http_handlers::list_permission_modules_handler,
        company_access_service::interface::http_handlers::create_access_draft_handler,
        company_access_service::interface::http_handlers::get_access_draft_handler,
        company_access_service::interface::http_handlers::apply_access_command_handler,
        company_access_service::interface::http_handlers::discard_access_draft_handler,
    ),
    components(schemas(
        Company, AccessGrant, AccessCommand, CompaniesListResponse, CreateCompanyRequest,
        PermissionModuleResponse, PermissionModulesResponse, CreateAccessDraftRequest,
        AccessDraftResponse, ErrorResponse
    )),
    tags(
        (name = "Companies", description = "Company directory and permission catalog"),
        (name = "Access Drafts", description = "Per-user company access editing")
    )
)]
pub struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let app_state = AppStateBuilder::new()
        .with_config(config.clone())
        .build()
        .await?;

    let v1_routes = Router::new()
        .route(
            "/companies",
            get(list_companies_handler).post(create_company_handler),
        )
        .route("/permission-modules", get(list_permission_modules_handler))
        .route("/access-drafts", post(create_access_draft_handler))
        .route(
            "/access-drafts/{draft_id}",
            get(get_access_draft_handler).delete(discard_access_draft_handler),
        )
        .route(
            "/access-drafts/{draft_id}/commands",
            post(apply_access_command_handler),
        );

    let app = Router::new()
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/swagger").url("/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let http_addr = config.http_address();
    let listener = TcpListener::bind(&http_addr).await?;
    tracing::info!("HTTP server running at http://{http_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

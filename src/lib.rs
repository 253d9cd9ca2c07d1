pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod test_utils;

use domain::company::Company;
use infrastructure::access_draft_repository::DEFAULT_DRAFT_TTL_SECS;
use infrastructure::{
    AccessDraftRepository, CompanyRepository, InMemoryAccessDraftRepository,
    InMemoryCompanyRepository,
};
use interface::AppState;
use std::sync::Arc;

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Application configuration with all environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub http_host: String,
    pub http_port: u16,
    /// Company names registered in the directory at startup
    pub seed_companies: Vec<String>,
    /// Seconds an untouched access draft is kept
    pub draft_ttl_secs: u64,
}

impl AppConfig {
    /// Creates a new AppConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_host = std::env::var("HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let http_port = match std::env::var("HTTP_PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid(format!("HTTP_PORT must be a port, got {port}")))?,
            Err(_) => 8080,
        };
        let seed_companies = std::env::var("SEED_COMPANIES")
            .map(|names| Self::parse_company_names(&names))
            .unwrap_or_default();
        let draft_ttl_secs = match std::env::var("DRAFT_TTL_SECS") {
            Ok(secs) => secs
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "DRAFT_TTL_SECS must be a positive number of seconds, got {secs}"
                    ))
                })?,
            Err(_) => DEFAULT_DRAFT_TTL_SECS,
        };

        Ok(AppConfig {
            http_host,
            http_port,
            seed_companies,
            draft_ttl_secs,
        })
    }

    /// Creates an AppConfig with custom values (useful for testing)
    pub fn new(http_host: String, http_port: u16, seed_companies: Vec<String>) -> Self {
        Self {
            http_host,
            http_port,
            seed_companies,
            draft_ttl_secs: DEFAULT_DRAFT_TTL_SECS,
        }
    }

    /// Overrides the draft expiry
    pub fn with_draft_ttl_secs(mut self, draft_ttl_secs: u64) -> Self {
        self.draft_ttl_secs = draft_ttl_secs;
        self
    }

    /// Creates the HTTP address string from host and port
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Splits a comma separated list, dropping blank entries
    fn parse_company_names(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// APPLICATION BUILDER
// ============================================================================

/// Builder for creating application state with better testability
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<AppConfig>,
    company_repo: Option<Arc<dyn CompanyRepository>>,
}

impl std::fmt::Debug for AppStateBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStateBuilder")
            .field("config", &self.config)
            .field("company_repo", &self.company_repo.is_some())
            .finish()
    }
}

impl AppStateBuilder {
    /// Creates a new AppStateBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses an existing company directory instead of an empty in-memory one
    pub fn with_company_repo(mut self, company_repo: Arc<dyn CompanyRepository>) -> Self {
        self.company_repo = Some(company_repo);
        self
    }

    /// Builds the application state, registering the configured seed companies
    pub async fn build(self) -> Result<Arc<AppState>, AppError> {
        let config = self.config.ok_or(AppError::MissingConfig)?;

        let company_repo = self
            .company_repo
            .unwrap_or_else(|| Arc::new(InMemoryCompanyRepository::new()) as Arc<dyn CompanyRepository>);
        for name in &config.seed_companies {
            let company: Company = company_repo
                .create_company(name)
                .await
                .map_err(|e| AppError::Initialization(e.to_string()))?;
            tracing::debug!(company_id = company.id, "Seeded company");
        }

        let draft_ttl =
            chrono::Duration::from_std(std::time::Duration::from_secs(config.draft_ttl_secs))
                .map_err(|e| AppError::Initialization(e.to_string()))?;
        let draft_repo = Arc::new(InMemoryAccessDraftRepository::with_ttl(draft_ttl))
            as Arc<dyn AccessDraftRepository>;

        Ok(Arc::new(AppState {
            company_repo,
            draft_repo,
        }))
    }
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing configuration")]
    MissingConfig,
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Initialization error: {0}")]
    Initialization(String),
}

// ============================================================================
// TESTING UTILITIES
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-wide; serialize the tests touching them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_app_config_new() {
        let config = AppConfig::new("test_host".to_string(), 3000, vec![]);

        assert_eq!(config.http_host, "test_host");
        assert_eq!(config.http_port, 3000);
        assert!(config.seed_companies.is_empty());
        assert_eq!(config.draft_ttl_secs, 3600);

        let config = config.with_draft_ttl_secs(60);
        assert_eq!(config.draft_ttl_secs, 60);
    }

    #[test]
    fn test_app_config_http_address() {
        let config = AppConfig::new("localhost".to_string(), 8080, vec![]);
        assert_eq!(config.http_address(), "localhost:8080");
    }

    #[test]
    fn test_app_config_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        test_helpers::setup_test_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.http_host, "0.0.0.0");
        assert_eq!(config.http_port, 9090);
        assert_eq!(
            config.seed_companies,
            vec![
                "Acme".to_string(),
                "Globex".to_string(),
                "Initech".to_string()
            ]
        );
        assert_eq!(config.draft_ttl_secs, 600);

        test_helpers::cleanup_test_env();
    }

    #[test]
    fn test_app_config_from_env_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        test_helpers::cleanup_test_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.http_host, "127.0.0.1"); // default value
        assert_eq!(config.http_port, 8080); // default value
        assert!(config.seed_companies.is_empty());
        assert_eq!(config.draft_ttl_secs, 3600); // default value
    }

    #[test]
    fn test_app_config_from_env_invalid_port() {
        let _guard = ENV_LOCK.lock().unwrap();
        test_helpers::cleanup_test_env();
        unsafe {
            std::env::set_var("HTTP_PORT", "not-a-port");
        }

        let result = AppConfig::from_env();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        test_helpers::cleanup_test_env();
    }

    #[test]
    fn test_app_config_from_env_invalid_draft_ttl() {
        let _guard = ENV_LOCK.lock().unwrap();
        test_helpers::cleanup_test_env();

        for value in ["0", "soon", "-5"] {
            unsafe {
                std::env::set_var("DRAFT_TTL_SECS", value);
            }
            let result = AppConfig::from_env();
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "{value}");
        }

        test_helpers::cleanup_test_env();
    }

    #[test]
    fn test_app_state_builder_new() {
        let builder = AppStateBuilder::new();
        assert!(builder.config.is_none());
        assert!(builder.company_repo.is_none());
    }

    #[tokio::test]
    async fn test_app_state_builder_build_missing_config() {
        let result = AppStateBuilder::new().build().await;
        assert!(matches!(result, Err(AppError::MissingConfig)));
    }

    #[tokio::test]
    async fn test_app_state_builder_seeds_companies() {
        let state = AppStateBuilder::new()
            .with_config(test_helpers::create_test_config())
            .build()
            .await
            .unwrap();

        let companies = state.company_repo.list_companies().await.unwrap();
        assert_eq!(
            companies,
            vec![Company::new(1, "Acme"), Company::new(2, "Globex")]
        );
    }

    #[tokio::test]
    async fn test_app_state_builder_with_company_repo() {
        let repo = Arc::new(InMemoryCompanyRepository::with_companies(vec![
            Company::new(5, "Existing"),
        ]));
        let state = AppStateBuilder::new()
            .with_config(test_helpers::create_test_config())
            .with_company_repo(repo)
            .build()
            .await
            .unwrap();

        let companies = state.company_repo.list_companies().await.unwrap();
        assert_eq!(companies.len(), 3);
        assert_eq!(companies[1], Company::new(6, "Acme"));
    }

    #[tokio::test]
    async fn test_app_state_builder_rejects_out_of_range_draft_ttl() {
        let config = test_helpers::create_test_config().with_draft_ttl_secs(u64::MAX);
        let result = AppStateBuilder::new().with_config(config).build().await;
        assert!(matches!(result, Err(AppError::Initialization(_))));
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::Invalid("bad value".to_string());
        assert_eq!(error.to_string(), "Invalid configuration: bad value");
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_error: AppError = ConfigError::Invalid("x".to_string()).into();
        assert!(matches!(app_error, AppError::Config(_)));
        assert_eq!(app_error.to_string(), "Configuration error: Invalid configuration: x");
    }
}

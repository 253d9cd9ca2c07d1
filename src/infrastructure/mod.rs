use crate::application::access_matrix::{AccessDraftSnapshot, AccessMatrixError};
use crate::application::commands::AccessCommand;
use crate::application::validators::ValidationError;
use crate::domain::access_grant::AccessGrant;
use crate::domain::company::Company;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// Infrastructure layer: in-memory stores for the company directory and open drafts
pub mod access_draft_repository;
pub use access_draft_repository::InMemoryAccessDraftRepository;

pub mod company_repository;
pub use company_repository::InMemoryCompanyRepository;

pub type RepoResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Access draft not found: {0}")]
    DraftNotFound(String),
    #[error(transparent)]
    Command(#[from] AccessMatrixError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// An open draft as seen from outside the repository.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessDraftRecord {
    pub draft_id: String,
    pub opened_at: DateTime<Utc>,
    pub snapshot: AccessDraftSnapshot,
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create_company(&self, name: &str) -> RepoResult<Company>;
    async fn list_companies(&self) -> RepoResult<Vec<Company>>;
}

#[async_trait]
pub trait AccessDraftRepository: Send + Sync {
    async fn open_draft(
        &self,
        companies: Vec<Company>,
        initial_grants: Option<Vec<AccessGrant>>,
    ) -> RepoResult<AccessDraftRecord>;
    async fn get_draft(&self, draft_id: &str) -> RepoResult<AccessDraftRecord>;
    async fn apply_command(
        &self,
        draft_id: &str,
        command: AccessCommand,
    ) -> RepoResult<AccessDraftRecord>;
    async fn discard_draft(&self, draft_id: &str) -> RepoResult<()>;
}

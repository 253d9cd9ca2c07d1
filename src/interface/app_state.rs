use crate::infrastructure::{AccessDraftRepository, CompanyRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub company_repo: Arc<dyn CompanyRepository>,
    pub draft_repo: Arc<dyn AccessDraftRepository>,
}

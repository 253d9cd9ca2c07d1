use crate::application::access_matrix::AccessMatrixStore;
use crate::domain::access_grant::AccessGrant;
use crate::domain::company::Company;
use crate::infrastructure::{
    AccessDraftRepository, CompanyRepository, InMemoryAccessDraftRepository,
    InMemoryCompanyRepository,
};
use crate::interface::app_state::AppState;
use std::sync::{Arc, Mutex};

/// Companies A, B and C with ids 1 to 3
pub fn create_test_companies() -> Vec<Company> {
    vec![
        Company::new(1, "A"),
        Company::new(2, "B"),
        Company::new(3, "C"),
    ]
}

/// Admin grant on company A with sales [View, Add] and purchase [View]
pub fn create_admin_grant() -> AccessGrant {
    AccessGrant::for_company(&Company::new(1, "A"))
        .with_role("Admin")
        .with_permissions("sales", &["View", "Add"])
        .with_permissions("purchase", &["View"])
}

/// Error sink that records every reported message
#[derive(Clone, Default)]
pub struct RecordingErrorSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl crate::application::access_matrix::ErrorSink for RecordingErrorSink {
    fn report(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// Builds a store over the test companies, returning the sink for assertions
pub fn create_test_store(
    initial_grants: Option<Vec<AccessGrant>>,
) -> (AccessMatrixStore, RecordingErrorSink) {
    let sink = RecordingErrorSink::new();
    let store = AccessMatrixStore::new(create_test_companies(), initial_grants, sink.clone());
    (store, sink)
}

/// Creates a test AppState backed by in-memory repositories holding the test companies
pub fn create_test_app_state() -> Arc<AppState> {
    let company_repo = Arc::new(InMemoryCompanyRepository::with_companies(
        create_test_companies(),
    )) as Arc<dyn CompanyRepository>;
    let draft_repo =
        Arc::new(InMemoryAccessDraftRepository::new()) as Arc<dyn AccessDraftRepository>;
    Arc::new(AppState {
        company_repo,
        draft_repo,
    })
}

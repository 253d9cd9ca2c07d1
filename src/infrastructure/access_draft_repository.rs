use super::{AccessDraftRecord, AccessDraftRepository, RepoResult, RepositoryError};
use crate::application::access_matrix::AccessMatrixStore;
use crate::application::commands::AccessCommand;
use crate::application::validators::InitialGrantsValidator;
use crate::domain::access_grant::AccessGrant;
use crate::domain::company::Company;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Seconds a draft may sit untouched before it is dropped.
pub const DEFAULT_DRAFT_TTL_SECS: u64 = 3600;

struct AccessDraft {
    opened_at: DateTime<Utc>,
    last_used_at: DateTime<Utc>,
    store: AccessMatrixStore,
}

impl AccessDraft {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_used_at >= ttl
    }
}

/// Open access drafts keyed by draft id.
///
/// Each draft sits behind its own lock so commands against one draft run one at a time.
/// A draft not read or edited within the TTL reads as not found and is swept on the
/// next `open_draft`.
pub struct InMemoryAccessDraftRepository {
    drafts: RwLock<HashMap<String, Arc<Mutex<AccessDraft>>>>,
    ttl: Duration,
}

impl InMemoryAccessDraftRepository {
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_DRAFT_TTL_SECS as i64))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            drafts: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Locks a live draft and marks it as used.
    async fn checkout(&self, draft_id: &str) -> RepoResult<OwnedMutexGuard<AccessDraft>> {
        let draft = self
            .drafts
            .read()
            .await
            .get(draft_id)
            .cloned()
            .ok_or_else(|| RepositoryError::DraftNotFound(draft_id.to_string()))?;
        let mut draft = draft.lock_owned().await;
        let now = Utc::now();
        if draft.is_expired(now, self.ttl) {
            tracing::debug!(draft_id, "Access draft expired");
            return Err(RepositoryError::DraftNotFound(draft_id.to_string()));
        }
        draft.last_used_at = now;
        Ok(draft)
    }

    /// Drops expired drafts. Drafts locked by a running command are kept.
    async fn sweep_expired(&self) {
        let now = Utc::now();
        let ttl = self.ttl;
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, draft| {
            draft
                .try_lock()
                .map_or(true, |draft| !draft.is_expired(now, ttl))
        });
        let swept = before - drafts.len();
        if swept > 0 {
            tracing::info!(swept, "Expired access drafts removed");
        }
    }
}

impl Default for InMemoryAccessDraftRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn record(draft_id: &str, draft: &AccessDraft) -> AccessDraftRecord {
    AccessDraftRecord {
        draft_id: draft_id.to_string(),
        opened_at: draft.opened_at,
        snapshot: draft.store.snapshot(),
    }
}

#[async_trait]
impl AccessDraftRepository for InMemoryAccessDraftRepository {
    async fn open_draft(
        &self,
        companies: Vec<Company>,
        initial_grants: Option<Vec<AccessGrant>>,
    ) -> RepoResult<AccessDraftRecord> {
        self.sweep_expired().await;
        let draft_id = uuid::Uuid::new_v4().to_string();
        let sink_id = draft_id.clone();
        let store = AccessMatrixStore::new(companies, initial_grants, move |message: &str| {
            tracing::warn!(draft_id = %sink_id, reason = message, "Access draft operation rejected")
        });
        let now = Utc::now();
        let draft = AccessDraft {
            opened_at: now,
            last_used_at: now,
            store,
        };
        let opened = record(&draft_id, &draft);
        self.drafts
            .write()
            .await
            .insert(draft_id.clone(), Arc::new(Mutex::new(draft)));
        tracing::info!(
            draft_id = %draft_id,
            grants = opened.snapshot.grants.len(),
            "Access draft opened"
        );
        Ok(opened)
    }

    async fn get_draft(&self, draft_id: &str) -> RepoResult<AccessDraftRecord> {
        let draft = self.checkout(draft_id).await?;
        Ok(record(draft_id, &draft))
    }

    async fn apply_command(
        &self,
        draft_id: &str,
        command: AccessCommand,
    ) -> RepoResult<AccessDraftRecord> {
        let mut draft = self.checkout(draft_id).await?;
        tracing::debug!(draft_id, command = command.kind(), "Applying access command");
        if let AccessCommand::Reinitialize { grants } = &command {
            if let Err(err) = InitialGrantsValidator::validate(draft.store.companies(), grants) {
                tracing::warn!(draft_id, error = %err, "Reloaded grants rejected");
                return Err(err.into());
            }
        }
        draft.store.apply(command)?;
        Ok(record(draft_id, &draft))
    }

    async fn discard_draft(&self, draft_id: &str) -> RepoResult<()> {
        match self.drafts.write().await.remove(draft_id) {
            Some(_) => {
                tracing::info!(draft_id, "Access draft discarded");
                Ok(())
            }
            None => Err(RepositoryError::DraftNotFound(draft_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::access_matrix::AccessMatrixError;
    use crate::application::validators::ValidationError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::util::SubscriberInitExt;

    /// Counts `WARN` events seen on the current thread.
    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn companies() -> Vec<Company> {
        vec![Company::new(1, "A"), Company::new(2, "B")]
    }

    /// Moves a draft's last use back in time.
    async fn idle(repo: &InMemoryAccessDraftRepository, draft_id: &str, by: Duration) {
        let draft = repo.drafts.read().await.get(draft_id).cloned().unwrap();
        let mut draft = draft.lock().await;
        draft.last_used_at = draft.last_used_at - by;
    }

    #[tokio::test]
    async fn test_open_and_get_draft() {
        let repo = InMemoryAccessDraftRepository::new();
        let opened = repo.open_draft(companies(), None).await.unwrap();
        let fetched = repo.get_draft(&opened.draft_id).await.unwrap();
        assert_eq!(opened, fetched);
        assert_eq!(fetched.snapshot.available_companies.len(), 2);
    }

    #[tokio::test]
    async fn test_apply_commands() {
        let repo = InMemoryAccessDraftRepository::new();
        let id = repo.open_draft(companies(), None).await.unwrap().draft_id;
        repo.apply_command(&id, AccessCommand::SelectCompany { company_id: 2 })
            .await
            .unwrap();
        let record = repo
            .apply_command(&id, AccessCommand::AddSelectedCompany)
            .await
            .unwrap();
        assert_eq!(record.snapshot.grants.len(), 1);
        assert_eq!(record.snapshot.grants[0].company_id, 2);
    }

    #[tokio::test]
    async fn test_rejected_command_surfaces_error() {
        let repo = InMemoryAccessDraftRepository::new();
        let id = repo.open_draft(companies(), None).await.unwrap().draft_id;
        let err = repo
            .apply_command(&id, AccessCommand::AddSelectedCompany)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Command(AccessMatrixError::NoCompanySelected)
        );
        assert_eq!(err.to_string(), "Please select a company");
    }

    #[tokio::test]
    async fn test_rejected_add_logs_one_warning() {
        let warnings = WarnCounter::default();
        let _guard = tracing_subscriber::registry()
            .with(warnings.clone())
            .set_default();

        let repo = InMemoryAccessDraftRepository::new();
        let id = repo.open_draft(companies(), None).await.unwrap().draft_id;
        repo.apply_command(&id, AccessCommand::AddSelectedCompany)
            .await
            .unwrap_err();

        assert_eq!(warnings.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_discard_draft() {
        let repo = InMemoryAccessDraftRepository::new();
        let id = repo.open_draft(companies(), None).await.unwrap().draft_id;
        repo.discard_draft(&id).await.unwrap();
        assert_eq!(
            repo.get_draft(&id).await.unwrap_err(),
            RepositoryError::DraftNotFound(id.clone())
        );
        assert!(repo.discard_draft(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_reinitialize_rejects_duplicate_or_unknown_companies() {
        let repo = InMemoryAccessDraftRepository::new();
        let loaded = AccessGrant::for_company(&Company::new(1, "A")).with_role("Admin");
        let id = repo
            .open_draft(companies(), Some(vec![loaded.clone()]))
            .await
            .unwrap()
            .draft_id;
        let b = AccessGrant::for_company(&Company::new(2, "B"));
        let ghost = AccessGrant::for_company(&Company::new(99, "Ghost"));

        let err = repo
            .apply_command(
                &id,
                AccessCommand::Reinitialize {
                    grants: vec![b.clone(), b.clone()],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Validation(ValidationError::DuplicateCompany(2))
        );

        let err = repo
            .apply_command(
                &id,
                AccessCommand::Reinitialize {
                    grants: vec![b.clone(), ghost],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Validation(ValidationError::UnknownCompany(99))
        );

        let snapshot = repo.get_draft(&id).await.unwrap().snapshot;
        assert_eq!(snapshot.grants, vec![loaded]);

        let record = repo
            .apply_command(&id, AccessCommand::Reinitialize { grants: vec![b.clone()] })
            .await
            .unwrap();
        assert_eq!(record.snapshot.grants, vec![b]);
    }

    #[tokio::test]
    async fn test_expired_draft_is_not_found() {
        let repo = InMemoryAccessDraftRepository::with_ttl(Duration::minutes(30));
        let id = repo.open_draft(companies(), None).await.unwrap().draft_id;
        idle(&repo, &id, Duration::minutes(31)).await;

        assert_eq!(
            repo.get_draft(&id).await.unwrap_err(),
            RepositoryError::DraftNotFound(id.clone())
        );
        assert_eq!(
            repo.apply_command(&id, AccessCommand::Reset).await.unwrap_err(),
            RepositoryError::DraftNotFound(id.clone())
        );
    }

    #[tokio::test]
    async fn test_use_keeps_draft_alive() {
        let repo = InMemoryAccessDraftRepository::with_ttl(Duration::minutes(30));
        let id = repo.open_draft(companies(), None).await.unwrap().draft_id;
        idle(&repo, &id, Duration::minutes(20)).await;
        repo.apply_command(&id, AccessCommand::SelectCompany { company_id: 1 })
            .await
            .unwrap();
        idle(&repo, &id, Duration::minutes(20)).await;

        let record = repo.get_draft(&id).await.unwrap();
        assert_eq!(record.snapshot.selected_company_id, Some(1));
    }

    #[tokio::test]
    async fn test_open_draft_sweeps_expired_drafts() {
        let repo = InMemoryAccessDraftRepository::with_ttl(Duration::minutes(30));
        let stale = repo.open_draft(companies(), None).await.unwrap().draft_id;
        let fresh = repo.open_draft(companies(), None).await.unwrap().draft_id;
        idle(&repo, &stale, Duration::hours(2)).await;

        let newest = repo.open_draft(companies(), None).await.unwrap().draft_id;
        let drafts = repo.drafts.read().await;
        assert_eq!(drafts.len(), 2);
        assert!(!drafts.contains_key(&stale));
        assert!(drafts.contains_key(&fresh));
        assert!(drafts.contains_key(&newest));
    }
}

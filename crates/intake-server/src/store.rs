use async_trait::async_trait;
use intake_core::{RecruitmentSubmission, RegistrationSubmission};
use intake_store::error::StoreError;
use intake_store::repo::{RecruitmentRecord, RegistrationRecord};
use intake_store::Store;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::error::StorageFailure;

/// Keyed insert-or-replace for each submission kind.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn upsert_recruitment(
        &self,
        now_utc: i64,
        source: &str,
        submission: &RecruitmentSubmission,
    ) -> Result<RecruitmentRecord, StorageFailure>;

    async fn upsert_registration(
        &self,
        now_utc: i64,
        source: &str,
        submission: &RegistrationSubmission,
    ) -> Result<RegistrationRecord, StorageFailure>;
}

/// Runs the synchronous SQLite store on the blocking pool.
#[derive(Clone)]
pub struct SqliteSubmissionStore {
    store: Arc<Mutex<Store>>,
    timeout: Duration,
}

impl SqliteSubmissionStore {
    pub fn new(store: Store, timeout: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            timeout,
        }
    }

    /// Runs `op` on the calling thread while holding the connection.
    pub fn with_store<T>(&self, op: impl FnOnce(&Store) -> T) -> T {
        let guard = self.store.lock();
        op(&*guard)
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StorageFailure>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let task = tokio::task::spawn_blocking(move || {
            let guard = store.lock();
            op(&*guard)
        });
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result.map_err(StorageFailure::from),
            Ok(Err(join_err)) => Err(StorageFailure::Task(join_err.to_string())),
            Err(_) => Err(StorageFailure::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl SubmissionStore for SqliteSubmissionStore {
    async fn upsert_recruitment(
        &self,
        now_utc: i64,
        source: &str,
        submission: &RecruitmentSubmission,
    ) -> Result<RecruitmentRecord, StorageFailure> {
        let source = source.to_string();
        let submission = submission.clone();
        self.run(move |store| store.recruitment().upsert(now_utc, &source, &submission))
            .await
    }

    async fn upsert_registration(
        &self,
        now_utc: i64,
        source: &str,
        submission: &RegistrationSubmission,
    ) -> Result<RegistrationRecord, StorageFailure> {
        let source = source.to_string();
        let submission = submission.clone();
        self.run(move |store| store.registrations().upsert(now_utc, &source, &submission))
            .await
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use intake_config::{AppConfig, KindConfig};
use intake_core::{RecruitmentSubmission, RegistrationSubmission, SubmissionPolicy};
use intake_server::store::{SqliteSubmissionStore, SubmissionStore};
use intake_server::{Intake, Mailer, Notifier, NotifyError, OutboundMessage, StorageFailure};
use intake_store::repo::{RecruitmentRecord, RegistrationRecord};
use intake_store::Store;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wraps the SQLite adapter and counts every upsert.
pub struct CountingStore {
    inner: SqliteSubmissionStore,
    pub calls: AtomicUsize,
}

impl CountingStore {
    pub fn in_memory() -> Arc<Self> {
        let store = Store::open_in_memory().expect("open store");
        store.migrate().expect("migrate");
        Arc::new(Self {
            inner: SqliteSubmissionStore::new(store, Duration::from_secs(5)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionStore for CountingStore {
    async fn upsert_recruitment(
        &self,
        now_utc: i64,
        source: &str,
        submission: &RecruitmentSubmission,
    ) -> Result<RecruitmentRecord, StorageFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .upsert_recruitment(now_utc, source, submission)
            .await
    }

    async fn upsert_registration(
        &self,
        now_utc: i64,
        source: &str,
        submission: &RegistrationSubmission,
    ) -> Result<RegistrationRecord, StorageFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .upsert_registration(now_utc, source, submission)
            .await
    }
}

impl CountingStore {
    pub fn registration(&self, email: &str) -> Option<RegistrationRecord> {
        self.inner_store(|store| store.registrations().get_by_email(email).expect("lookup"))
    }

    pub fn recruitment(&self, email: &str) -> Option<RecruitmentRecord> {
        self.inner_store(|store| store.recruitment().get_by_email(email).expect("lookup"))
    }

    pub fn registration_count(&self) -> i64 {
        self.inner_store(|store| store.registrations().count().expect("count"))
    }

    pub fn recruitment_count(&self) -> i64 {
        self.inner_store(|store| store.recruitment().count().expect("count"))
    }

    fn inner_store<T>(&self, op: impl FnOnce(&Store) -> T) -> T {
        self.inner.with_store(op)
    }
}

/// Every upsert fails.
pub struct BrokenStore;

#[async_trait]
impl SubmissionStore for BrokenStore {
    async fn upsert_recruitment(
        &self,
        _now_utc: i64,
        _source: &str,
        _submission: &RecruitmentSubmission,
    ) -> Result<RecruitmentRecord, StorageFailure> {
        Err(StorageFailure::Task("database is locked".to_string()))
    }

    async fn upsert_registration(
        &self,
        _now_utc: i64,
        _source: &str,
        _submission: &RegistrationSubmission,
    ) -> Result<RegistrationRecord, StorageFailure> {
        Err(StorageFailure::Task("database is locked".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutboundMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

/// Every send fails.
pub struct FailingMailer {
    pub attempts: AtomicUsize,
}

impl FailingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            attempts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &OutboundMessage) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

/// Never completes within a test's lifetime.
pub struct StalledMailer;

#[async_trait]
impl Mailer for StalledMailer {
    async fn send(&self, _message: &OutboundMessage) -> Result<(), NotifyError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

pub fn notifier(mailer: Arc<dyn Mailer>) -> Notifier {
    Notifier::new(
        mailer,
        "Club <club@example.com>"
            .parse()
            .expect("sender"),
        "Welcome",
        Duration::from_secs(5),
    )
}

pub fn intake(store: Arc<dyn SubmissionStore>, notifier: Option<Notifier>) -> Intake {
    let defaults = AppConfig::default();
    Intake::new(
        store,
        notifier,
        defaults.limits,
        defaults.recruitment,
        defaults.registration,
    )
}

pub fn open_recruitment() -> KindConfig {
    let mut config = AppConfig::default().recruitment;
    config.policy = SubmissionPolicy::any_domain();
    config
}

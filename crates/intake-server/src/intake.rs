//! Per-request orchestration: validate, store, then notify.

use intake_config::KindConfig;
use intake_core::time::now_utc;
use intake_core::{
    validate_recruitment, validate_registration, FieldLimits, RecruitmentAck, RegistrationAck,
    SubmissionKind,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::IntakeError;
use crate::notify::{NotifyError, Notifier};
use crate::store::SubmissionStore;

/// What happened to the welcome message. Never reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted<A> {
    pub ack: A,
    pub notify: NotifyOutcome,
}

#[derive(Clone)]
pub struct Intake {
    store: Arc<dyn SubmissionStore>,
    notifier: Option<Notifier>,
    limits: FieldLimits,
    recruitment: KindConfig,
    registration: KindConfig,
}

impl Intake {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        notifier: Option<Notifier>,
        limits: FieldLimits,
        recruitment: KindConfig,
        registration: KindConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            limits,
            recruitment,
            registration,
        }
    }

    pub async fn submit_recruitment(
        &self,
        payload: &Value,
    ) -> Result<Accepted<RecruitmentAck>, IntakeError> {
        let kind = SubmissionKind::Recruitment;
        let config = &self.recruitment;
        let submission = validate_recruitment(payload, &self.limits, &config.policy)
            .inspect_err(|reason| debug!(%kind, code = reason.code(), "submission rejected"))?;

        let record = self
            .store
            .upsert_recruitment(now_utc(), &config.source, &submission)
            .await
            .map_err(|source| {
                error!(%kind, error = %source, "failed to store submission");
                IntakeError::Storage { kind, source }
            })?;
        info!(%kind, name = %record.fields.name, id = %record.id, "submission stored");

        let notify = match self.notifier.as_ref() {
            Some(notifier) if config.welcome_email => {
                contain(kind, notifier.send_recruitment_unlocked(&record)).await
            }
            _ => NotifyOutcome::Skipped,
        };

        Ok(Accepted {
            ack: RecruitmentAck::from(&submission),
            notify,
        })
    }

    pub async fn submit_registration(
        &self,
        payload: &Value,
    ) -> Result<Accepted<RegistrationAck>, IntakeError> {
        let kind = SubmissionKind::Registration;
        let config = &self.registration;
        let submission = validate_registration(payload, &self.limits, &config.policy)
            .inspect_err(|reason| debug!(%kind, code = reason.code(), "submission rejected"))?;

        let record = self
            .store
            .upsert_registration(now_utc(), &config.source, &submission)
            .await
            .map_err(|source| {
                error!(%kind, error = %source, "failed to store submission");
                IntakeError::Storage { kind, source }
            })?;
        info!(%kind, name = %record.fields.name, id = %record.id, "submission stored");

        let notify = match self.notifier.as_ref() {
            Some(notifier) if config.welcome_email => {
                contain(kind, notifier.send_welcome(&record)).await
            }
            _ => NotifyOutcome::Skipped,
        };

        Ok(Accepted {
            ack: RegistrationAck::from(&submission),
            notify,
        })
    }
}

/// The only place a notification error is observed.
async fn contain<F>(kind: SubmissionKind, send: F) -> NotifyOutcome
where
    F: Future<Output = Result<(), NotifyError>>,
{
    match send.await {
        Ok(()) => {
            info!(%kind, "welcome message sent");
            NotifyOutcome::Sent
        }
        Err(err) => {
            warn!(%kind, error = %err, "welcome message failed");
            NotifyOutcome::Failed
        }
    }
}

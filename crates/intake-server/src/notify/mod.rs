//! Outbound welcome mail.
//!
//! A [`Mailer`] only knows how to deliver a built message. The [`Notifier`]
//! renders the message for a stored record, bounds the send with a timeout,
//! and reports failures as [`NotifyError`] for the caller to contain.

mod log;
mod smtp;

#[cfg(feature = "gmail-api")]
mod gmail;

pub use self::log::LogMailer;
pub use self::smtp::SmtpMailer;

#[cfg(feature = "gmail-api")]
pub use self::gmail::GmailMailer;

use async_trait::async_trait;
use intake_config::{NotificationBackend, NotificationsConfig};
use intake_store::repo::{RecruitmentRecord, RegistrationRecord};
use lettre::message::{Mailbox, MultiPart};
use lettre::Message;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::message::{render_recruitment_unlocked, render_welcome, RenderedMessage};

pub const RECRUITMENT_SUBJECT: &str = "Your recruitment challenges are unlocked";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address {address:?}")]
    Address { address: String },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("authorization failed: {0}")]
    Auth(String),
    #[error("invalid notifier configuration: {0}")]
    Config(String),
    #[error("send timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0} transport is not available in this build")]
    Unavailable(&'static str),
}

/// A fully addressed message ready for any transport.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutboundMessage {
    pub fn to_lettre(&self) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                self.text.clone(),
                self.html.clone(),
            ))
            .map_err(|err| NotifyError::Build(err.to_string()))
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError>;
}

pub fn build_mailer(config: &NotificationsConfig) -> Result<Arc<dyn Mailer>, NotifyError> {
    match config.backend {
        NotificationBackend::Log => Ok(Arc::new(LogMailer)),
        NotificationBackend::Smtp => {
            let smtp = config
                .smtp
                .as_ref()
                .ok_or_else(|| NotifyError::Config("notifications.smtp is missing".to_string()))?;
            Ok(Arc::new(SmtpMailer::new(smtp)?))
        }
        #[cfg(feature = "gmail-api")]
        NotificationBackend::Gmail => {
            let gmail = config
                .gmail
                .as_ref()
                .ok_or_else(|| NotifyError::Config("notifications.gmail is missing".to_string()))?;
            Ok(Arc::new(GmailMailer::new(gmail)?))
        }
        #[cfg(not(feature = "gmail-api"))]
        NotificationBackend::Gmail => Err(NotifyError::Unavailable("gmail")),
    }
}

/// Welcome-mail sender bound to one sender identity.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    sender: Mailbox,
    subject: String,
    timeout: Duration,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        sender: Mailbox,
        subject: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            mailer,
            sender,
            subject: subject.into(),
            timeout,
        }
    }

    /// Returns `Ok(None)` when notifications are disabled.
    pub fn from_config(config: &NotificationsConfig) -> Result<Option<Self>, NotifyError> {
        if !config.enabled {
            return Ok(None);
        }
        let from = config
            .from
            .as_deref()
            .ok_or_else(|| NotifyError::Config("notifications.from is missing".to_string()))?;
        let address = from.parse().map_err(|_| NotifyError::Address {
            address: from.to_string(),
        })?;
        let sender = Mailbox::new(Some(config.sender_name.clone()), address);
        let mailer = build_mailer(config)?;
        Ok(Some(Self::new(
            mailer,
            sender,
            config.subject.clone(),
            Duration::from_secs(config.timeout_seconds),
        )))
    }

    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }

    pub async fn send_welcome(&self, record: &RegistrationRecord) -> Result<(), NotifyError> {
        self.deliver(
            &record.email,
            &record.fields.name,
            &self.subject,
            render_welcome(record),
        )
        .await
    }

    pub async fn send_recruitment_unlocked(
        &self,
        record: &RecruitmentRecord,
    ) -> Result<(), NotifyError> {
        self.deliver(
            &record.email,
            &record.fields.name,
            RECRUITMENT_SUBJECT,
            render_recruitment_unlocked(record),
        )
        .await
    }

    async fn deliver(
        &self,
        email: &str,
        name: &str,
        subject: &str,
        rendered: RenderedMessage,
    ) -> Result<(), NotifyError> {
        let to = email.parse().map_err(|_| NotifyError::Address {
            address: email.to_string(),
        })?;
        let message = OutboundMessage {
            from: self.sender.clone(),
            to: Mailbox::new(Some(name.to_string()), to),
            subject: subject.to_string(),
            html: rendered.html,
            text: rendered.text,
        };
        match tokio::time::timeout(self.timeout, self.mailer.send(&message)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(self.timeout)),
        }
    }
}

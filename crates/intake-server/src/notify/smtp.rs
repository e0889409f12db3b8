use async_trait::async_trait;
use intake_config::{EmailTls, SmtpConfig};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport as _};
use std::env;
use std::time::Duration;

use super::{Mailer, NotifyError, OutboundMessage};

pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let invalid_host =
            |_| NotifyError::Config(format!("invalid notifications.smtp.host {}", config.host));
        let mut builder = match config.tls {
            EmailTls::Tls => SmtpTransport::relay(&config.host).map_err(invalid_host)?,
            EmailTls::StartTls => SmtpTransport::starttls_relay(&config.host).map_err(invalid_host)?,
            EmailTls::None => SmtpTransport::builder_dangerous(&config.host),
        };

        if let Some(port) = config.port {
            builder = builder.port(port);
        }

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Some(Duration::from_secs(seconds)));
        }

        if let (Some(username), Some(password_env)) =
            (config.username.as_deref(), config.password_env.as_deref())
        {
            let password = read_secret(password_env)?;
            builder = builder.credentials(Credentials::new(username.to_string(), password));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

pub(crate) fn read_secret(var: &str) -> Result<String, NotifyError> {
    let value = env::var(var).map_err(|_| NotifyError::Config(format!("missing env var {var}")))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(NotifyError::Config(format!("env var {var} is empty")));
    }
    Ok(value.to_string())
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        let email = message.to_lettre()?;
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        Ok(())
    }
}

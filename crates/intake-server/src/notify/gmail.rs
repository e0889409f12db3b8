use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use intake_config::GmailConfig;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::debug;

use super::smtp::read_secret;
use super::{Mailer, NotifyError, OutboundMessage};

const DEFAULT_CLIENT_TIMEOUT_SECONDS: u64 = 15;
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Sends through the Gmail REST API using an OAuth2 refresh token.
pub struct GmailMailer {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_url: String,
    send_url: String,
    access_token: Mutex<Option<CachedToken>>,
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl GmailMailer {
    pub fn new(config: &GmailConfig) -> Result<Self, NotifyError> {
        let timeout = config
            .timeout_seconds
            .unwrap_or(DEFAULT_CLIENT_TIMEOUT_SECONDS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|err| NotifyError::Config(err.to_string()))?;
        Ok(Self {
            client,
            client_id: read_secret(&config.client_id_env)?,
            client_secret: read_secret(&config.client_secret_env)?,
            refresh_token: read_secret(&config.refresh_token_env)?,
            token_url: config.token_url.clone(),
            send_url: format!(
                "{}/gmail/v1/users/me/messages/send",
                config.api_base.trim_end_matches('/')
            ),
            access_token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, NotifyError> {
        let cached = self.access_token.lock().clone();
        if let Some(cached) = cached {
            if Instant::now() < cached.expires_at {
                return Ok(cached.value);
            }
        }

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Auth(format!("token endpoint returned {status}")));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| NotifyError::Auth(err.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(0));
        let expires_at = Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN);
        *self.access_token.lock() = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });
        debug!("gmail access token refreshed");
        Ok(token.access_token)
    }
}

#[async_trait]
impl Mailer for GmailMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        let raw = URL_SAFE.encode(message.to_lettre()?.formatted());
        let token = self.access_token().await?;
        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(token)
            .json(&json!({ "raw": raw }))
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.access_token.lock().take();
            return Err(NotifyError::Auth("gmail rejected the access token".to_string()));
        }
        if !status.is_success() {
            return Err(NotifyError::Transport(format!("gmail send returned {status}")));
        }
        Ok(())
    }
}

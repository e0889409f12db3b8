use async_trait::async_trait;
use tracing::info;

use super::{Mailer, NotifyError, OutboundMessage};

/// Records the envelope instead of delivering it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        info!(
            to = %message.to.email,
            from = %message.from,
            subject = %message.subject,
            "welcome message (log transport)"
        );
        Ok(())
    }
}

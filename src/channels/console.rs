//! Non-live channel adapter that logs messages instead of delivering them.

use async_trait::async_trait;
use log::info;

use crate::channels::{ChannelError, ChannelKind, DeliveryChannel, RenderedContent};
use crate::domain::models::notification::Recipient;

/// Deterministic stand-in for a real delivery provider.
///
/// Logs the rendered message and reports success. Useful for demo
/// deployments and for channels (SMS, WhatsApp) whose production adapter
/// is provider-specific and wired in by the integrator.
pub struct ConsoleChannel {
    kind: ChannelKind,
}

impl ConsoleChannel {
    pub fn new(kind: ChannelKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl DeliveryChannel for ConsoleChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn deliver(
        &self,
        recipient: &Recipient,
        content: &RenderedContent,
    ) -> Result<(), ChannelError> {
        match content {
            RenderedContent::Email { subject, .. } => {
                let to = recipient
                    .email
                    .as_deref()
                    .ok_or(ChannelError::MissingContact("email"))?;
                info!("[{} demo] to={} subject={}", self.kind, to, subject);
            }
            RenderedContent::Text(text) => {
                let to = recipient
                    .phone
                    .as_deref()
                    .ok_or(ChannelError::MissingContact("phone"))?;
                info!("[{} demo] to={} message={}", self.kind, to, text);
            }
        }
        Ok(())
    }
}

//! # Delivery Channels
//!
//! The delivery seam the dispatcher fans out through. Each channel is an
//! independent sink: an attempt succeeds or fails on its own and the
//! dispatcher never treats a channel failure as fatal.

pub mod console;
pub mod email;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::models::notification::Recipient;

pub use console::ConsoleChannel;
pub use email::{SmtpConfig, SmtpEmailChannel};

/// The three delivery media a notification can be routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Email,
    Sms,
    WhatsApp,
}

impl ChannelKind {
    /// Name used in `NotificationLog.channels_used`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Sms => "sms",
            ChannelKind::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content rendered for one channel attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedContent {
    /// Email carries a subject line and an HTML body.
    Email { subject: String, html_body: String },
    /// SMS and WhatsApp carry a single short text.
    Text(String),
}

/// Why a single channel attempt failed.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("recipient has no {0} address")]
    MissingContact(&'static str),
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

/// One delivery sink (email, SMS, or WhatsApp).
///
/// Implementations must not panic on delivery problems; they report them
/// as `ChannelError` and the dispatcher records the outcome in the log.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    async fn deliver(
        &self,
        recipient: &Recipient,
        content: &RenderedContent,
    ) -> Result<(), ChannelError>;
}

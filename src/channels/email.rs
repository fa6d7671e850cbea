//! SMTP-backed email channel.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use log::info;
use serde::{Deserialize, Serialize};

use crate::channels::{ChannelError, ChannelKind, DeliveryChannel, RenderedContent};
use crate::domain::models::notification::Recipient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
        }
    }
}

/// Email delivery through an SMTP relay.
pub struct SmtpEmailChannel {
    config: SmtpConfig,
    transport: SmtpTransport,
}

impl SmtpEmailChannel {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        info!(
            "📧 Initializing email channel for SMTP server: {}:{}",
            config.smtp_server, config.smtp_port
        );

        let tls_params = TlsParameters::new(config.smtp_server.clone())
            .context("Failed to create TLS parameters")?;

        let transport = SmtpTransport::relay(&config.smtp_server)
            .context("Failed to create SMTP relay")?
            .port(config.smtp_port)
            .tls(Tls::Required(tls_params))
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { config, transport })
    }

    fn build_message(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<Message> {
        Message::builder()
            .from(
                self.config
                    .from_email
                    .parse::<Mailbox>()
                    .context("Failed to parse from email")?,
            )
            .to(to.parse::<Mailbox>().context("Failed to parse to email")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("Failed to build email")
    }
}

#[async_trait]
impl DeliveryChannel for SmtpEmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn deliver(
        &self,
        recipient: &Recipient,
        content: &RenderedContent,
    ) -> Result<(), ChannelError> {
        let to = recipient
            .email
            .as_deref()
            .ok_or(ChannelError::MissingContact("email"))?;

        let (subject, html_body) = match content {
            RenderedContent::Email { subject, html_body } => (subject.as_str(), html_body.as_str()),
            RenderedContent::Text(text) => ("BloodLink Notification", text.as_str()),
        };

        let message = self.build_message(to, subject, html_body)?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .context("Email send task failed")?
            .context("Failed to send email")?;

        info!("📧 Email sent to {}", to);
        Ok(())
    }
}

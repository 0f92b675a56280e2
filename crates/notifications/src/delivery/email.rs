//! Email notification delivery via SMTP.
//!
//! [`EmailChannel`] wraps the `lettre` async SMTP transport to send plain-text
//! release notifications. Configuration is loaded from environment variables;
//! if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! email channel should be registered.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use metal_detector_core::channels::ChannelKind;
use metal_detector_core::error::CoreError;
use metal_detector_core::traits::{NotificationChannel, NotificationEvent};

use crate::render;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@metal-detector.local";

/// Configuration for the SMTP email channel.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                        |
    /// |-----------------|----------|--------------------------------|
    /// | `SMTP_HOST`     | yes      |                                |
    /// | `SMTP_PORT`     | no       | `587`                          |
    /// | `SMTP_FROM`     | no       | `noreply@metal-detector.local` |
    /// | `SMTP_USER`     | no       |                                |
    /// | `SMTP_PASSWORD` | no       |                                |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailChannel
// ---------------------------------------------------------------------------

/// Sends release notifications as plain-text emails.
///
/// The SMTP transport is built once and reused for every message.
pub struct EmailChannel {
    from_address: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            from_address: config.from_address,
            mailer: builder.build(),
        })
    }

    /// Assemble the message for `event` without sending it.
    pub fn build_message(&self, event: &NotificationEvent) -> Result<Message, EmailError> {
        Message::builder()
            .from(self.from_address.parse()?)
            .to(event.recipient.email.parse()?)
            .subject(render::subject(event.payload.kind()))
            .header(ContentType::TEXT_PLAIN)
            .body(render::body(event))
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    async fn deliver(&self, event: &NotificationEvent) -> Result<(), EmailError> {
        let message = self.build_message(event)?;
        self.mailer.send(message).await?;

        tracing::info!(
            user_id = event.recipient.user_id,
            kind = %event.payload.kind(),
            "Notification email sent"
        );
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), CoreError> {
        self.deliver(event)
            .await
            .map_err(|e| CoreError::delivery(ChannelKind::Email, e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

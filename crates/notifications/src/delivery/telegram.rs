//! Telegram delivery through the Bot API `sendMessage` method.
//!
//! Only recipients that linked a chat with the bot have a chat id; sending
//! to anyone else is a delivery error for this channel alone.

use std::time::Duration;

use async_trait::async_trait;
use metal_detector_core::channels::ChannelKind;
use metal_detector_core::error::CoreError;
use metal_detector_core::traits::{NotificationChannel, NotificationEvent};
use serde::{Deserialize, Serialize};

use crate::render;

/// HTTP request timeout for a single `sendMessage` call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_API_URL: &str = "https://api.telegram.org";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Bot API answered with `ok: false` or a non-2xx status.
    #[error("Telegram API error (HTTP {status}): {description}")]
    Api { status: u16, description: String },

    #[error("Recipient has no linked Telegram chat")]
    NoChat,
}

// ---------------------------------------------------------------------------
// TelegramConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Bot API base URL without trailing slash.
    pub api_url: String,
}

impl TelegramConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `TELEGRAM_BOT_TOKEN` is not set.
    ///
    /// | Variable             | Required | Default                    |
    /// |----------------------|----------|----------------------------|
    /// | `TELEGRAM_BOT_TOKEN` | yes      |                            |
    /// | `TELEGRAM_API_URL`   | no       | `https://api.telegram.org` |
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        Some(Self {
            bot_token,
            api_url: std::env::var("TELEGRAM_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

// ---------------------------------------------------------------------------
// TelegramChannel
// ---------------------------------------------------------------------------

pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url, self.config.bot_token
        )
    }

    /// Message text: the subject as headline followed by the rendered body.
    pub fn message_text(event: &NotificationEvent) -> String {
        format!(
            "{}\n\n{}",
            render::subject(event.payload.kind()),
            render::body(event)
        )
    }

    async fn deliver(&self, event: &NotificationEvent) -> Result<(), TelegramError> {
        let chat_id = event.recipient.telegram_chat_id.ok_or(TelegramError::NoChat)?;
        let text = Self::message_text(event);

        let response = self
            .client
            .post(self.send_message_url())
            .json(&SendMessageRequest {
                chat_id,
                text: &text,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        check_response(status, &body)?;

        tracing::info!(
            user_id = event.recipient.user_id,
            kind = %event.payload.kind(),
            "Telegram notification sent"
        );
        Ok(())
    }
}

/// Interpret a `sendMessage` answer.
fn check_response(status: u16, body: &str) -> Result<(), TelegramError> {
    match serde_json::from_str::<BotApiResponse>(body) {
        Ok(parsed) if parsed.ok && (200..300).contains(&status) => Ok(()),
        Ok(parsed) => Err(TelegramError::Api {
            status,
            description: parsed.description.unwrap_or_default(),
        }),
        Err(_) => Err(TelegramError::Api {
            status,
            description: body.to_string(),
        }),
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Telegram
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), CoreError> {
        self.deliver(event)
            .await
            .map_err(|e| CoreError::delivery(ChannelKind::Telegram, e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

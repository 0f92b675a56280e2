//! User account models.

use metal_detector_core::recipient::Recipient;
use metal_detector_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub public_id: Uuid,
    pub username: String,
    pub email: String,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub enabled: bool,
}

/// A user joined with its optional Telegram link.
#[derive(Debug, Clone, FromRow)]
pub struct RecipientRow {
    pub id: DbId,
    pub public_id: Uuid,
    pub username: String,
    pub email: String,
    pub enabled: bool,
    pub telegram_chat_id: Option<i64>,
}

impl From<RecipientRow> for Recipient {
    fn from(row: RecipientRow) -> Self {
        Self {
            user_id: row.id,
            public_id: row.public_id,
            username: row.username,
            email: row.email,
            enabled: row.enabled,
            telegram_chat_id: row.telegram_chat_id,
        }
    }
}

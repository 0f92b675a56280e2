//! Repository for the `users` table.

use metal_detector_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{CreateUser, RecipientRow, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, public_id, username, email, enabled, created_at, updated_at";

/// Provides user lookups needed for notification delivery.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user with a fresh public id.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (public_id, username, email, enabled) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.enabled)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load a user together with the linked Telegram chat, if any.
    pub async fn find_recipient(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RecipientRow>, sqlx::Error> {
        sqlx::query_as::<_, RecipientRow>(
            "SELECT u.id, u.public_id, u.username, u.email, u.enabled, \
                    t.chat_id AS telegram_chat_id \
             FROM users u \
             LEFT JOIN telegram_configs t ON t.user_id = u.id \
             WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

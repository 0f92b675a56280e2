//! Repository for the `notification_configs` table.

use metal_detector_core::notification_config::{
    NotificationConfig, DEFAULT_FREQUENCY, DEFAULT_NOTIFY,
};
use metal_detector_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::notification_config::NotificationConfigRow;

/// Column list for `notification_configs` queries.
const COLUMNS: &str = "id, user_id, notify, frequency_in_weeks, \
    notification_at_release_date, notification_at_announcement_date, \
    last_notification_date, version, created_at, updated_at";

/// Provides CRUD operations for notification configs.
pub struct NotificationConfigRepo;

impl NotificationConfigRepo {
    /// Insert the default config for a newly registered user.
    pub async fn create_default(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<NotificationConfigRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_configs (user_id, notify, frequency_in_weeks) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationConfigRow>(&query)
            .bind(user_id)
            .bind(DEFAULT_NOTIFY)
            .bind(DEFAULT_FREQUENCY.weeks())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NotificationConfigRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_configs WHERE user_id = $1");
        sqlx::query_as::<_, NotificationConfigRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List configs whose owning user is enabled, ordered by id.
    pub async fn list_for_enabled_users(
        pool: &PgPool,
    ) -> Result<Vec<NotificationConfigRow>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM notification_configs c \
             JOIN users u ON u.id = c.user_id \
             WHERE u.enabled = true \
             ORDER BY c.id",
            qualified_columns("c")
        );
        sqlx::query_as::<_, NotificationConfigRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Write all mutable fields of `config` if its version is still current.
    ///
    /// Bumps `version` on success. Returns `None` when the row is missing or
    /// was modified since `config` was read.
    pub async fn update(
        pool: &PgPool,
        config: &NotificationConfig,
    ) -> Result<Option<NotificationConfigRow>, sqlx::Error> {
        let query = format!(
            "UPDATE notification_configs SET \
                notify = $3, \
                frequency_in_weeks = $4, \
                notification_at_release_date = $5, \
                notification_at_announcement_date = $6, \
                last_notification_date = $7, \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND version = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationConfigRow>(&query)
            .bind(config.id)
            .bind(config.version)
            .bind(config.notify)
            .bind(config.frequency.weeks())
            .bind(config.notification_at_release_date)
            .bind(config.notification_at_announcement_date)
            .bind(config.last_notification_date)
            .fetch_optional(pool)
            .await
    }

    /// Set `last_notification_date` without checking the version.
    ///
    /// Leaves every preference column untouched. Returns `None` when the
    /// row is missing.
    pub async fn mark_notified(
        pool: &PgPool,
        id: DbId,
        date: Date,
    ) -> Result<Option<NotificationConfigRow>, sqlx::Error> {
        let query = format!(
            "UPDATE notification_configs SET \
                last_notification_date = $2, \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationConfigRow>(&query)
            .bind(id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }
}

/// `COLUMNS` prefixed with a table alias, for joined queries.
fn qualified_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|column| format!("{alias}.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

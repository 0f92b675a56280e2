//! Notification config row and its conversion into the domain type.

use metal_detector_core::error::CoreError;
use metal_detector_core::notification_config::{Frequency, NotificationConfig};
use metal_detector_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notification_configs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationConfigRow {
    pub id: DbId,
    pub user_id: DbId,
    pub notify: bool,
    pub frequency_in_weeks: i32,
    pub notification_at_release_date: bool,
    pub notification_at_announcement_date: bool,
    pub last_notification_date: Option<Date>,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<NotificationConfigRow> for NotificationConfig {
    type Error = CoreError;

    fn try_from(row: NotificationConfigRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            notify: row.notify,
            frequency: Frequency::try_from(row.frequency_in_weeks)?,
            notification_at_release_date: row.notification_at_release_date,
            notification_at_announcement_date: row.notification_at_announcement_date,
            last_notification_date: row.last_notification_date,
            version: row.version,
        })
    }
}

//! Per-user notification preferences and the due-date rule.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// Interval between two periodic digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Frequency {
    TwoWeeks,
    FourWeeks,
}

/// Every frequency a user can choose. Release windows are computed for each.
pub const SUPPORTED_FREQUENCIES: [Frequency; 2] = [Frequency::TwoWeeks, Frequency::FourWeeks];

impl Frequency {
    pub fn weeks(self) -> i32 {
        match self {
            Self::TwoWeeks => 2,
            Self::FourWeeks => 4,
        }
    }

    pub fn duration(self) -> chrono::Duration {
        chrono::Duration::weeks(i64::from(self.weeks()))
    }
}

impl TryFrom<i32> for Frequency {
    type Error = CoreError;

    fn try_from(weeks: i32) -> Result<Self, Self::Error> {
        match weeks {
            2 => Ok(Self::TwoWeeks),
            4 => Ok(Self::FourWeeks),
            other => Err(CoreError::Validation(format!(
                "Unsupported notification frequency: {other} weeks (supported: 2, 4)"
            ))),
        }
    }
}

impl From<Frequency> for i32 {
    fn from(frequency: Frequency) -> Self {
        frequency.weeks()
    }
}

// ---------------------------------------------------------------------------
// NotificationConfig
// ---------------------------------------------------------------------------

/// A user's notification preferences. One per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub id: DbId,
    pub user_id: DbId,
    pub notify: bool,
    pub frequency: Frequency,
    pub notification_at_release_date: bool,
    pub notification_at_announcement_date: bool,
    pub last_notification_date: Option<Date>,
    /// Optimistic-lock counter, bumped by the store on every save.
    pub version: i32,
}

impl NotificationConfig {
    /// Whether a periodic digest is due on `today`.
    ///
    /// A config that was never notified is always due. Otherwise the number
    /// of whole weeks since the last digest must reach the frequency.
    pub fn is_due(&self, today: Date) -> bool {
        match self.last_notification_date {
            None => true,
            Some(last) => (today - last).num_weeks() >= i64::from(self.frequency.weeks()),
        }
    }

    /// Copy user-editable preferences onto this config.
    ///
    /// `last_notification_date` and `version` are left untouched.
    pub fn apply(&mut self, update: &UpdateNotificationConfig) -> Result<(), CoreError> {
        update
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        self.frequency = Frequency::try_from(update.frequency_in_weeks)?;
        self.notify = update.notify;
        self.notification_at_release_date = update.notification_at_release_date;
        self.notification_at_announcement_date = update.notification_at_announcement_date;
        Ok(())
    }
}

/// Defaults for a freshly registered user.
pub const DEFAULT_NOTIFY: bool = true;
pub const DEFAULT_FREQUENCY: Frequency = Frequency::FourWeeks;

/// DTO for updating a user's notification preferences.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationConfig {
    pub notify: bool,
    #[validate(range(min = 2, max = 4))]
    pub frequency_in_weeks: i32,
    pub notification_at_release_date: bool,
    pub notification_at_announcement_date: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

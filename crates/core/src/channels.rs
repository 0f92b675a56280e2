//! Delivery channels and notification kinds.
//!
//! The channel names must match the values written to logs and the
//! `channel` label used by the dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Email notification delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";

/// Telegram notification delivered through the bot API.
pub const CHANNEL_TELEGRAM: &str = "telegram";

/// The closed set of delivery channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Telegram,
}

impl ChannelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => CHANNEL_EMAIL,
            Self::Telegram => CHANNEL_TELEGRAM,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a notification is about. Each kind has its own subject and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Periodic aggregate of upcoming and recently released records.
    PeriodicDigest,
    /// Records released today.
    TodaysReleases,
    /// Records announced today.
    TodaysAnnouncements,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PeriodicDigest => "periodic_digest",
            Self::TodaysReleases => "todays_releases",
            Self::TodaysAnnouncements => "todays_announcements",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_match_constants() {
        assert_eq!(ChannelKind::Email.to_string(), CHANNEL_EMAIL);
        assert_eq!(ChannelKind::Telegram.to_string(), CHANNEL_TELEGRAM);
    }

    #[test]
    fn notification_kind_display() {
        assert_eq!(NotificationKind::PeriodicDigest.to_string(), "periodic_digest");
        assert_eq!(
            NotificationKind::TodaysAnnouncements.to_string(),
            "todays_announcements"
        );
    }
}

//! Collaborators consumed by the notification engine.
//!
//! Implementations live in other crates (PostgreSQL store, butler client,
//! email and Telegram channels) and are injected as `Arc<dyn Trait>`.

use async_trait::async_trait;

use crate::channels::{ChannelKind, NotificationKind};
use crate::error::CoreError;
use crate::notification_config::NotificationConfig;
use crate::recipient::Recipient;
use crate::release::{DateRange, Release};
use crate::types::{Date, DbId};

/// Supplies releases for a date range.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Find releases in `range`. An empty `artists` slice means all artists.
    async fn find_releases(
        &self,
        artists: &[String],
        range: DateRange,
    ) -> Result<Vec<Release>, CoreError>;
}

/// Supplies the artists a user follows.
#[async_trait]
pub trait FollowGraph: Send + Sync {
    async fn followed_artist_names(&self, user_id: DbId) -> Result<Vec<String>, CoreError>;
}

/// Persistent notification preferences.
#[async_trait]
pub trait NotificationConfigStore: Send + Sync {
    /// All configs whose owning user account is enabled.
    async fn find_all_enabled_configs(&self) -> Result<Vec<NotificationConfig>, CoreError>;

    async fn find_by_user_id(&self, user_id: DbId)
        -> Result<Option<NotificationConfig>, CoreError>;

    /// Persist `config` and return the stored row with its new version.
    ///
    /// Fails with [`CoreError::Conflict`] when the stored version differs
    /// from `config.version`.
    async fn save(&self, config: &NotificationConfig) -> Result<NotificationConfig, CoreError>;

    /// Record that a periodic digest went out on `date`.
    ///
    /// Only `last_notification_date` is written, whatever the stored version,
    /// so a settings change made while the digest was in flight is kept.
    /// Bumps the version. Fails with [`CoreError::NotFound`] when the config
    /// no longer exists.
    async fn mark_notified(
        &self,
        config_id: DbId,
        date: Date,
    ) -> Result<NotificationConfig, CoreError>;
}

/// Resolves user ids into deliverable recipients.
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    async fn find_recipient(&self, user_id: DbId) -> Result<Option<Recipient>, CoreError>;
}

/// A notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub recipient: Recipient,
    pub payload: NotificationPayload,
}

/// What is being delivered. The kind is derived from the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationPayload {
    PeriodicDigest {
        upcoming_releases: Vec<Release>,
        recent_releases: Vec<Release>,
    },
    TodaysReleases { releases: Vec<Release> },
    TodaysAnnouncements { releases: Vec<Release> },
}

impl NotificationPayload {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::PeriodicDigest { .. } => NotificationKind::PeriodicDigest,
            Self::TodaysReleases { .. } => NotificationKind::TodaysReleases,
            Self::TodaysAnnouncements { .. } => NotificationKind::TodaysAnnouncements,
        }
    }

    /// Total number of releases carried by this payload.
    pub fn release_count(&self) -> usize {
        match self {
            Self::PeriodicDigest {
                upcoming_releases,
                recent_releases,
            } => upcoming_releases.len() + recent_releases.len(),
            Self::TodaysReleases { releases } | Self::TodaysAnnouncements { releases } => {
                releases.len()
            }
        }
    }
}

/// A delivery mechanism. One implementation per [`ChannelKind`].
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    async fn send(&self, event: &NotificationEvent) -> Result<(), CoreError>;
}

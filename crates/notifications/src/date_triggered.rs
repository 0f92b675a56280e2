//! Same-day alerts on release date and announcement date.
//!
//! Both flows share one shape: take today's releases, keep those by artists
//! the user follows, and send one notification if anything is left. No state
//! is written, so running a flow twice on the same day sends twice.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use metal_detector_core::notification_config::NotificationConfig;
use metal_detector_core::release::{DateRange, Release};
use metal_detector_core::traits::{
    FollowGraph, NotificationEvent, NotificationPayload, RecipientDirectory,
};
use metal_detector_core::types::Date;

use crate::dispatch::ChannelDispatcher;
use crate::subscriber;
use crate::summary::{RunSummary, UserOutcome};

/// Which date of a release triggers the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTrigger {
    ReleaseDate,
    AnnouncementDate,
}

impl DateTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReleaseDate => "release_date",
            Self::AnnouncementDate => "announcement_date",
        }
    }

    /// Whether `config` subscribed to this alert.
    pub fn is_enabled(self, config: &NotificationConfig) -> bool {
        match self {
            Self::ReleaseDate => config.notification_at_release_date,
            Self::AnnouncementDate => config.notification_at_announcement_date,
        }
    }

    /// Release date range to query for `today`.
    ///
    /// Announced records are released later, so announcements need every
    /// release from today on.
    pub fn query_range(self, today: Date) -> DateRange {
        match self {
            Self::ReleaseDate => DateRange::single_day(today),
            Self::AnnouncementDate => DateRange::starting_at(today),
        }
    }

    /// Keep the releases whose trigger date is `today`.
    pub fn select_todays(self, releases: Vec<Release>, today: Date) -> Vec<Release> {
        releases
            .into_iter()
            .filter(|release| match self {
                Self::ReleaseDate => release.release_date == today,
                Self::AnnouncementDate => release.announcement_date == Some(today),
            })
            .collect()
    }

    pub fn payload(self, releases: Vec<Release>) -> NotificationPayload {
        match self {
            Self::ReleaseDate => NotificationPayload::TodaysReleases { releases },
            Self::AnnouncementDate => NotificationPayload::TodaysAnnouncements { releases },
        }
    }
}

pub struct DateTriggeredNotifier {
    follows: Arc<dyn FollowGraph>,
    recipients: Arc<dyn RecipientDirectory>,
    dispatcher: Arc<ChannelDispatcher>,
    concurrency: usize,
}

impl DateTriggeredNotifier {
    pub fn new(
        follows: Arc<dyn FollowGraph>,
        recipients: Arc<dyn RecipientDirectory>,
        dispatcher: Arc<ChannelDispatcher>,
        concurrency: usize,
    ) -> Self {
        Self {
            follows,
            recipients,
            dispatcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Alert every subscribed user about their share of `todays_releases`.
    ///
    /// Configs not subscribed to `trigger` are ignored and not counted.
    pub async fn run(
        &self,
        trigger: DateTrigger,
        todays_releases: &[Release],
        configs: Vec<NotificationConfig>,
    ) -> RunSummary {
        stream::iter(
            configs
                .into_iter()
                .filter(move |config| trigger.is_enabled(config)),
        )
        .map(|config| self.process(trigger, todays_releases, config))
        .buffer_unordered(self.concurrency)
        .collect::<RunSummary>()
        .await
    }

    async fn process(
        &self,
        trigger: DateTrigger,
        todays_releases: &[Release],
        config: NotificationConfig,
    ) -> UserOutcome {
        let user_id = config.user_id;

        let subscriber =
            match subscriber::load(&*self.recipients, &*self.follows, user_id).await {
                Ok(Some(subscriber)) => subscriber,
                Ok(None) => return UserOutcome::Skipped,
                Err(e) => {
                    tracing::error!(
                        user_id,
                        trigger = trigger.as_str(),
                        error = %e,
                        "Failed to load alert subscriber"
                    );
                    return UserOutcome::Failed;
                }
            };

        let releases = subscriber.followed.filter(todays_releases);
        if releases.is_empty() {
            return UserOutcome::Skipped;
        }

        let release_count = releases.len();
        let event = NotificationEvent {
            recipient: subscriber.recipient,
            payload: trigger.payload(releases),
        };

        match self.dispatcher.dispatch(&event).await {
            Ok(_) => {
                tracing::info!(
                    user_id,
                    trigger = trigger.as_str(),
                    release_count,
                    "Date alert delivered"
                );
                UserOutcome::Notified
            }
            Err(e) => {
                tracing::error!(
                    user_id,
                    trigger = trigger.as_str(),
                    error = %e,
                    "Date alert delivery failed"
                );
                UserOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn release(artist: &str, released: Date, announced: Option<Date>) -> Release {
        Release {
            artist_name: artist.to_string(),
            album_title: "Album".to_string(),
            release_date: released,
            announcement_date: announced,
        }
    }

    #[test]
    fn release_date_query_covers_only_today() {
        let today = date(2024, 1, 15);
        assert_eq!(
            DateTrigger::ReleaseDate.query_range(today),
            DateRange::new(today, today)
        );
    }

    #[test]
    fn announcement_query_is_open_ended() {
        let today = date(2024, 1, 15);
        assert_eq!(
            DateTrigger::AnnouncementDate.query_range(today),
            DateRange::starting_at(today)
        );
    }

    #[test]
    fn announcement_selection_uses_announcement_date() {
        let today = date(2024, 1, 15);
        let releases = vec![
            release("A", date(2024, 3, 1), Some(today)),
            release("B", date(2024, 3, 1), Some(date(2024, 1, 14))),
            release("C", today, None),
        ];

        let selected = DateTrigger::AnnouncementDate.select_todays(releases, today);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].artist_name, "A");
    }

    #[test]
    fn release_selection_uses_release_date() {
        let today = date(2024, 1, 15);
        let releases = vec![
            release("A", today, Some(date(2023, 11, 1))),
            release("B", date(2024, 1, 16), Some(today)),
        ];

        let selected = DateTrigger::ReleaseDate.select_todays(releases, today);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].artist_name, "A");
    }

    #[test]
    fn enabled_flag_per_trigger() {
        let config = NotificationConfig {
            id: 1,
            user_id: 1,
            notify: false,
            frequency: metal_detector_core::notification_config::Frequency::TwoWeeks,
            notification_at_release_date: true,
            notification_at_announcement_date: false,
            last_notification_date: None,
            version: 0,
        };

        assert!(DateTrigger::ReleaseDate.is_enabled(&config));
        assert!(!DateTrigger::AnnouncementDate.is_enabled(&config));
    }
}

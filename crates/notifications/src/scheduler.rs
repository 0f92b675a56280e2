//! Entry points driven by the worker's triggers.
//!
//! [`NotificationScheduler`] wires the collaborators into the window
//! calculator and the two notifiers. Each entry point takes `today`
//! explicitly, loads what the run needs once, and then hands off to
//! per-user processing. Failures of those shared inputs abort the run and
//! are returned; per-user failures only show up in the [`RunSummary`].

use std::sync::Arc;

use metal_detector_core::error::CoreError;
use metal_detector_core::notification_config::SUPPORTED_FREQUENCIES;
use metal_detector_core::traits::{
    FollowGraph, NotificationConfigStore, RecipientDirectory, ReleaseSource,
};
use metal_detector_core::types::Date;

use crate::date_triggered::{DateTrigger, DateTriggeredNotifier};
use crate::dispatch::ChannelDispatcher;
use crate::frequency::FrequencyNotifier;
use crate::summary::RunSummary;
use crate::window::ReleaseWindowCalculator;

/// The data-side collaborators of the engine.
#[derive(Clone)]
pub struct Collaborators {
    pub releases: Arc<dyn ReleaseSource>,
    pub follows: Arc<dyn FollowGraph>,
    pub configs: Arc<dyn NotificationConfigStore>,
    pub recipients: Arc<dyn RecipientDirectory>,
}

pub struct NotificationScheduler {
    releases: Arc<dyn ReleaseSource>,
    configs: Arc<dyn NotificationConfigStore>,
    windows: ReleaseWindowCalculator,
    frequency: FrequencyNotifier,
    date_triggered: DateTriggeredNotifier,
}

impl NotificationScheduler {
    pub fn new(
        collaborators: Collaborators,
        dispatcher: Arc<ChannelDispatcher>,
        concurrency: usize,
    ) -> Self {
        let Collaborators {
            releases,
            follows,
            configs,
            recipients,
        } = collaborators;

        Self {
            windows: ReleaseWindowCalculator::new(Arc::clone(&releases)),
            frequency: FrequencyNotifier::new(
                Arc::clone(&configs),
                Arc::clone(&follows),
                Arc::clone(&recipients),
                Arc::clone(&dispatcher),
                concurrency,
            ),
            date_triggered: DateTriggeredNotifier::new(
                follows,
                recipients,
                dispatcher,
                concurrency,
            ),
            releases,
            configs,
        }
    }

    /// Send periodic digests to every user whose interval has elapsed.
    pub async fn notify_on_frequency(&self, today: Date) -> Result<RunSummary, CoreError> {
        tracing::info!(%today, "Starting periodic digest run");

        let windows = self.windows.compute(today, &SUPPORTED_FREQUENCIES).await?;
        let configs = self.configs.find_all_enabled_configs().await?;

        let summary = self.frequency.run(today, &windows, configs).await;
        summary.log("frequency");
        Ok(summary)
    }

    /// Alert subscribed users about releases coming out today.
    pub async fn notify_on_release_date(&self, today: Date) -> Result<RunSummary, CoreError> {
        self.notify_on_date(DateTrigger::ReleaseDate, today).await
    }

    /// Alert subscribed users about releases announced today.
    pub async fn notify_on_announcement_date(
        &self,
        today: Date,
    ) -> Result<RunSummary, CoreError> {
        self.notify_on_date(DateTrigger::AnnouncementDate, today)
            .await
    }

    async fn notify_on_date(
        &self,
        trigger: DateTrigger,
        today: Date,
    ) -> Result<RunSummary, CoreError> {
        tracing::info!(%today, trigger = trigger.as_str(), "Starting date alert run");

        let releases = self
            .releases
            .find_releases(&[], trigger.query_range(today))
            .await?;
        let todays_releases = trigger.select_todays(releases, today);
        let configs = self.configs.find_all_enabled_configs().await?;

        tracing::debug!(
            trigger = trigger.as_str(),
            release_count = todays_releases.len(),
            config_count = configs.len(),
            "Loaded date alert inputs"
        );

        let summary = self
            .date_triggered
            .run(trigger, &todays_releases, configs)
            .await;
        summary.log(trigger.as_str());
        Ok(summary)
    }
}

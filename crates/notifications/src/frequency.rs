//! Periodic digest notifications.
//!
//! [`FrequencyNotifier`] walks all notification configs, sends a digest to
//! every user whose interval has elapsed and who has matching releases, and
//! records the send date. Each user is processed in isolation: a failure is
//! logged and counted, and the remaining users are still processed.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use metal_detector_core::notification_config::NotificationConfig;
use metal_detector_core::release_window::ReleaseWindows;
use metal_detector_core::traits::{
    FollowGraph, NotificationConfigStore, NotificationEvent, NotificationPayload,
    RecipientDirectory,
};
use metal_detector_core::types::Date;

use crate::dispatch::ChannelDispatcher;
use crate::subscriber;
use crate::summary::{RunSummary, UserOutcome};

pub struct FrequencyNotifier {
    store: Arc<dyn NotificationConfigStore>,
    follows: Arc<dyn FollowGraph>,
    recipients: Arc<dyn RecipientDirectory>,
    dispatcher: Arc<ChannelDispatcher>,
    concurrency: usize,
}

impl FrequencyNotifier {
    pub fn new(
        store: Arc<dyn NotificationConfigStore>,
        follows: Arc<dyn FollowGraph>,
        recipients: Arc<dyn RecipientDirectory>,
        dispatcher: Arc<ChannelDispatcher>,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            follows,
            recipients,
            dispatcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Send due digests for `configs` using the precomputed `windows`.
    ///
    /// Configs with `notify = false` are ignored and not counted.
    pub async fn run(
        &self,
        today: Date,
        windows: &ReleaseWindows,
        configs: Vec<NotificationConfig>,
    ) -> RunSummary {
        stream::iter(configs.into_iter().filter(|config| config.notify))
            .map(|config| self.process(today, windows, config))
            .buffer_unordered(self.concurrency)
            .collect::<RunSummary>()
            .await
    }

    async fn process(
        &self,
        today: Date,
        windows: &ReleaseWindows,
        config: NotificationConfig,
    ) -> UserOutcome {
        let user_id = config.user_id;

        if !config.is_due(today) {
            tracing::trace!(user_id, last = ?config.last_notification_date, "Digest not due");
            return UserOutcome::Skipped;
        }

        let Some(window) = windows.get(&config.frequency) else {
            tracing::error!(
                user_id,
                weeks = config.frequency.weeks(),
                "No release window computed for frequency"
            );
            return UserOutcome::Failed;
        };

        let subscriber =
            match subscriber::load(&*self.recipients, &*self.follows, user_id).await {
                Ok(Some(subscriber)) => subscriber,
                Ok(None) => return UserOutcome::Skipped,
                Err(e) => {
                    tracing::error!(user_id, error = %e, "Failed to load digest subscriber");
                    return UserOutcome::Failed;
                }
            };

        let upcoming_releases = subscriber.followed.filter(&window.upcoming_releases);
        let recent_releases = subscriber.followed.filter(&window.recent_releases);

        // Nothing to report: stay due so the next run checks again.
        if upcoming_releases.is_empty() && recent_releases.is_empty() {
            tracing::debug!(user_id, "No releases of followed artists in window");
            return UserOutcome::Skipped;
        }

        let event = NotificationEvent {
            recipient: subscriber.recipient,
            payload: NotificationPayload::PeriodicDigest {
                upcoming_releases,
                recent_releases,
            },
        };

        if let Err(e) = self.dispatcher.dispatch(&event).await {
            tracing::error!(user_id, error = %e, "Digest delivery failed");
            return UserOutcome::Failed;
        }

        match self.store.mark_notified(config.id, today).await {
            Ok(_) => {
                tracing::info!(
                    user_id,
                    release_count = event.payload.release_count(),
                    "Digest delivered"
                );
                UserOutcome::Notified
            }
            Err(e) => {
                tracing::error!(
                    user_id,
                    error = %e,
                    "Digest delivered but last notification date was not saved"
                );
                UserOutcome::Failed
            }
        }
    }
}

//! Fan-out of a notification to the recipient's channels.

use std::sync::Arc;

use metal_detector_core::channels::ChannelKind;
use metal_detector_core::error::CoreError;
use metal_detector_core::traits::{NotificationChannel, NotificationEvent};

/// Result of a dispatch where at least one channel delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: Vec<ChannelKind>,
    /// Channels the recipient wanted but that failed or are not configured.
    pub failed: Vec<(ChannelKind, String)>,
}

/// Sends notifications through the registered channels.
///
/// Holds at most one channel per [`ChannelKind`]; registering a kind twice
/// replaces the earlier channel.
#[derive(Default)]
pub struct ChannelDispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl ChannelDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.register(channel);
        self
    }

    pub fn register(&mut self, channel: Arc<dyn NotificationChannel>) {
        let kind = channel.kind();
        self.channels.retain(|c| c.kind() != kind);
        self.channels.push(channel);
        tracing::info!(channel = %kind, "Notification channel registered");
    }

    /// Kinds of all registered channels.
    pub fn registered(&self) -> Vec<ChannelKind> {
        self.channels.iter().map(|c| c.kind()).collect()
    }

    fn channel(&self, kind: ChannelKind) -> Option<&Arc<dyn NotificationChannel>> {
        self.channels.iter().find(|c| c.kind() == kind)
    }

    /// Deliver `event` on every channel the recipient has configured.
    ///
    /// Channels are tried in the recipient's order and a failing channel
    /// does not stop the others. Fails with [`CoreError::Delivery`] only
    /// when no channel delivered.
    pub async fn dispatch(&self, event: &NotificationEvent) -> Result<DispatchReport, CoreError> {
        let user_id = event.recipient.user_id;
        let kind = event.payload.kind();
        let mut report = DispatchReport::default();

        for channel_kind in event.recipient.channels() {
            let Some(channel) = self.channel(channel_kind) else {
                tracing::debug!(user_id, channel = %channel_kind, "Channel not configured");
                report
                    .failed
                    .push((channel_kind, "channel not configured".to_string()));
                continue;
            };

            match channel.send(event).await {
                Ok(()) => {
                    tracing::debug!(user_id, channel = %channel_kind, kind = %kind, "Notification delivered");
                    report.delivered.push(channel_kind);
                }
                Err(e) => {
                    tracing::warn!(
                        user_id,
                        channel = %channel_kind,
                        kind = %kind,
                        error = %e,
                        "Notification delivery failed"
                    );
                    report.failed.push((channel_kind, e.to_string()));
                }
            }
        }

        if report.delivered.is_empty() {
            let (channel, message) = report
                .failed
                .into_iter()
                .next()
                .unwrap_or((ChannelKind::Email, "no channel available".to_string()));
            return Err(CoreError::Delivery { channel, message });
        }

        Ok(report)
    }
}

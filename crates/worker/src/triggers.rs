//! Cron triggers for the notification runs.
//!
//! Each trigger runs as its own task: it sleeps until the next fire time of
//! its schedule, runs the job to completion, and only then computes the next
//! fire time, so a trigger never overlaps with itself. Cancellation is only
//! observed while sleeping; an in-flight run always finishes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use cron::Schedule;
use metal_detector_core::error::CoreError;
use metal_detector_core::types::Date;
use metal_detector_notifications::{NotificationScheduler, RunSummary};
use tokio_util::sync::CancellationToken;

/// The three notification runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Frequency,
    ReleaseDate,
    AnnouncementDate,
}

impl TriggerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::ReleaseDate => "release_date",
            Self::AnnouncementDate => "announcement_date",
        }
    }
}

/// First fire time of `schedule` strictly after `after`.
pub fn next_fire<Tz: TimeZone>(schedule: &Schedule, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    schedule.after(after).next()
}

/// Run `kind` against `scheduler` on every fire time of `schedule`.
pub async fn run_scheduled(
    kind: TriggerKind,
    schedule: Schedule,
    scheduler: Arc<NotificationScheduler>,
    cancel: CancellationToken,
) {
    run_trigger(kind, &schedule, cancel, move |today| {
        let scheduler = Arc::clone(&scheduler);
        async move {
            match kind {
                TriggerKind::Frequency => scheduler.notify_on_frequency(today).await,
                TriggerKind::ReleaseDate => scheduler.notify_on_release_date(today).await,
                TriggerKind::AnnouncementDate => {
                    scheduler.notify_on_announcement_date(today).await
                }
            }
        }
    })
    .await;
}

/// Trigger loop: call `job` with the local date at every fire time until
/// `cancel` is cancelled or the schedule has no further fire times.
pub async fn run_trigger<F, Fut>(
    kind: TriggerKind,
    schedule: &Schedule,
    cancel: CancellationToken,
    mut job: F,
) where
    F: FnMut(Date) -> Fut,
    Fut: Future<Output = Result<RunSummary, CoreError>>,
{
    tracing::info!(trigger = kind.as_str(), "Notification trigger started");

    loop {
        let now = Local::now();
        let Some(next) = next_fire(schedule, &now) else {
            tracing::warn!(trigger = kind.as_str(), "Schedule has no upcoming fire time");
            break;
        };
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!(trigger = kind.as_str(), next = %next, "Next run scheduled");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(trigger = kind.as_str(), "Notification trigger cancelled");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                let today = Local::now().date_naive();
                if let Err(e) = job(today).await {
                    tracing::error!(
                        trigger = kind.as_str(),
                        %today,
                        error = %e,
                        "Notification run aborted"
                    );
                }
            }
        }
    }
}

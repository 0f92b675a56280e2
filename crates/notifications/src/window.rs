//! Release windows for the periodic digest run.

use std::sync::Arc;

use metal_detector_core::error::CoreError;
use metal_detector_core::notification_config::Frequency;
use metal_detector_core::release_window::{
    recent_range, upcoming_range, ReleaseWindow, ReleaseWindows,
};
use metal_detector_core::traits::ReleaseSource;
use metal_detector_core::types::Date;

/// Fetches the upcoming and recent releases for each frequency.
///
/// Issues two release queries per frequency regardless of the number of
/// users, so every user on a frequency shares one window.
pub struct ReleaseWindowCalculator {
    source: Arc<dyn ReleaseSource>,
}

impl ReleaseWindowCalculator {
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self { source }
    }

    /// Compute the windows for `today`. Any release query failure aborts.
    pub async fn compute(
        &self,
        today: Date,
        frequencies: &[Frequency],
    ) -> Result<ReleaseWindows, CoreError> {
        let mut windows = ReleaseWindows::with_capacity(frequencies.len());

        for &frequency in frequencies {
            if windows.contains_key(&frequency) {
                continue;
            }

            let (upcoming_releases, recent_releases) = futures::try_join!(
                self.source
                    .find_releases(&[], upcoming_range(today, frequency)),
                self.source.find_releases(&[], recent_range(today, frequency)),
            )?;

            tracing::debug!(
                weeks = frequency.weeks(),
                upcoming = upcoming_releases.len(),
                recent = recent_releases.len(),
                "Release window computed"
            );

            windows.insert(
                frequency,
                ReleaseWindow {
                    upcoming_releases,
                    recent_releases,
                },
            );
        }

        Ok(windows)
    }
}

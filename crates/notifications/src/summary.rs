//! Per-run counters.

/// How a single user's processing ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOutcome {
    Notified,
    Skipped,
    Failed,
}

/// Counters for one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Configs that were subscribed to the run's notification type.
    pub considered: usize,
    /// Users that received a notification.
    pub notified: usize,
    /// Users with nothing to send (not due, no follows, no matching releases).
    pub skipped: usize,
    /// Users whose processing failed and was isolated.
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: UserOutcome) {
        self.considered += 1;
        match outcome {
            UserOutcome::Notified => self.notified += 1,
            UserOutcome::Skipped => self.skipped += 1,
            UserOutcome::Failed => self.failed += 1,
        }
    }

    /// Emit the summary as a single structured log line.
    pub fn log(&self, run: &'static str) {
        if self.failed > 0 {
            tracing::warn!(
                run,
                considered = self.considered,
                notified = self.notified,
                skipped = self.skipped,
                failed = self.failed,
                "Notification run finished with failures"
            );
        } else {
            tracing::info!(
                run,
                considered = self.considered,
                notified = self.notified,
                skipped = self.skipped,
                "Notification run finished"
            );
        }
    }
}

impl Extend<UserOutcome> for RunSummary {
    fn extend<I: IntoIterator<Item = UserOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.record(outcome);
        }
    }
}

impl FromIterator<UserOutcome> for RunSummary {
    fn from_iter<I: IntoIterator<Item = UserOutcome>>(iter: I) -> Self {
        let mut summary = Self::default();
        summary.extend(iter);
        summary
    }
}

//! Date windows for periodic digests.
//!
//! For a frequency of `f` weeks the digest covers upcoming releases in
//! `[today, today + f]` and recent releases in `[today - f, today - 1 day]`.

use std::collections::HashMap;

use crate::notification_config::Frequency;
use crate::release::{DateRange, Release};
use crate::types::Date;

/// Range of upcoming releases for a digest sent on `today`.
pub fn upcoming_range(today: Date, frequency: Frequency) -> DateRange {
    DateRange::new(today, today + frequency.duration())
}

/// Range of already released records for a digest sent on `today`.
pub fn recent_range(today: Date, frequency: Frequency) -> DateRange {
    DateRange::new(
        today - frequency.duration(),
        today - chrono::Duration::days(1),
    )
}

/// Releases relevant to one frequency, shared by every user on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseWindow {
    pub upcoming_releases: Vec<Release>,
    pub recent_releases: Vec<Release>,
}

/// Release windows keyed by frequency, computed once per run.
pub type ReleaseWindows = HashMap<Frequency, ReleaseWindow>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_week_windows() {
        let today = date(2024, 1, 15);

        assert_eq!(
            upcoming_range(today, Frequency::TwoWeeks),
            DateRange::new(date(2024, 1, 15), date(2024, 1, 29))
        );
        assert_eq!(
            recent_range(today, Frequency::TwoWeeks),
            DateRange::new(date(2024, 1, 1), date(2024, 1, 14))
        );
    }

    #[test]
    fn four_week_windows_cross_month_boundaries() {
        let today = date(2024, 2, 20);

        assert_eq!(
            upcoming_range(today, Frequency::FourWeeks),
            DateRange::new(date(2024, 2, 20), date(2024, 3, 19))
        );
        assert_eq!(
            recent_range(today, Frequency::FourWeeks),
            DateRange::new(date(2024, 1, 23), date(2024, 2, 19))
        );
    }

    #[test]
    fn windows_do_not_overlap() {
        let today = date(2024, 6, 1);
        for frequency in crate::notification_config::SUPPORTED_FREQUENCIES {
            let recent = recent_range(today, frequency);
            let upcoming = upcoming_range(today, frequency);
            assert!(!recent.contains(today));
            assert!(upcoming.contains(today));
            assert_eq!(recent.to.unwrap().succ_opt(), Some(upcoming.from));
        }
    }
}

//! Releases as reported by the release butler.

use serde::{Deserialize, Serialize};

use crate::types::Date;

/// A single record release. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub artist_name: String,
    pub album_title: String,
    pub release_date: Date,
    pub announcement_date: Option<Date>,
}

/// Inclusive date range used to query releases. `to = None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Date,
    pub to: Option<Date>,
}

impl DateRange {
    pub fn new(from: Date, to: Date) -> Self {
        Self { from, to: Some(to) }
    }

    pub fn starting_at(from: Date) -> Self {
        Self { from, to: None }
    }

    /// A range covering exactly one day.
    pub fn single_day(day: Date) -> Self {
        Self::new(day, day)
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.from && self.to.map_or(true, |to| date <= to)
    }
}

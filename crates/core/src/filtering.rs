//! Restricting releases to the artists a user follows.

use std::collections::HashSet;

use crate::release::Release;

/// Artist names a user follows. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowedArtists(HashSet<String>);

impl FollowedArtists {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, artist_name: &str) -> bool {
        self.0.contains(artist_name)
    }

    /// Releases by followed artists, in their original order.
    pub fn filter(&self, releases: &[Release]) -> Vec<Release> {
        releases
            .iter()
            .filter(|release| self.contains(&release.artist_name))
            .cloned()
            .collect()
    }
}

impl FromIterator<String> for FollowedArtists {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<String>> for FollowedArtists {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

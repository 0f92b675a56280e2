//! Wire types of the butler releases endpoint.

use chrono::NaiveDate;
use metal_detector_core::release::{DateRange, Release};
use serde::{Deserialize, Serialize};

/// Body of a `POST` to the releases endpoint.
///
/// `page = 0` and `size = 0` request all matching releases unpaginated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButlerReleasesRequest {
    pub page: u32,
    pub size: u32,
    pub artists: Vec<String>,
    pub date_from: NaiveDate,
    pub date_to: Option<NaiveDate>,
    pub sorting: String,
}

impl ButlerReleasesRequest {
    /// Unpaginated query for `artists` (empty = all) within `range`.
    pub fn unpaginated(artists: &[String], range: DateRange) -> Self {
        Self {
            page: 0,
            size: 0,
            artists: artists.to_vec(),
            date_from: range.from,
            date_to: range.to,
            sorting: String::new(),
        }
    }
}

/// Response of the releases endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButlerReleasesResponse {
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub releases: Vec<ButlerRelease>,
}

/// A single release as reported by the butler.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButlerRelease {
    pub artist: String,
    pub album_title: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub announcement_date: Option<NaiveDate>,
}

impl From<ButlerRelease> for Release {
    fn from(release: ButlerRelease) -> Self {
        Self {
            artist_name: release.artist,
            album_title: release.album_title,
            release_date: release.release_date,
            announcement_date: release.announcement_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn request_serializes_camel_case_with_iso_dates() {
        let request = ButlerReleasesRequest::unpaginated(
            &["Opeth".to_string()],
            DateRange::new(date(2024, 1, 15), date(2024, 1, 29)),
        );

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "page": 0,
                "size": 0,
                "artists": ["Opeth"],
                "dateFrom": "2024-01-15",
                "dateTo": "2024-01-29",
                "sorting": "",
            })
        );
    }

    #[test]
    fn open_range_sends_null_date_to() {
        let request =
            ButlerReleasesRequest::unpaginated(&[], DateRange::starting_at(date(2024, 1, 15)));

        let json = serde_json::to_value(&request).unwrap();

        assert!(json["dateTo"].is_null());
        assert_eq!(json["artists"], serde_json::json!([]));
    }

    #[test]
    fn response_parses_into_releases() {
        let body = r#"{
            "totalPages": 1,
            "releases": [
                {"artist": "Opeth", "albumTitle": "The Last Will", "releaseDate": "2024-10-11",
                 "announcementDate": "2024-07-01", "genre": "Progressive"},
                {"artist": "Emperor", "albumTitle": "Anthems", "releaseDate": "2024-10-12"}
            ]
        }"#;

        let response: ButlerReleasesResponse = serde_json::from_str(body).unwrap();
        let releases: Vec<Release> = response.releases.into_iter().map(Release::from).collect();

        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].artist_name, "Opeth");
        assert_eq!(releases[0].announcement_date, Some(date(2024, 7, 1)));
        assert_eq!(releases[1].announcement_date, None);
    }

    #[test]
    fn response_without_releases_is_empty() {
        let response: ButlerReleasesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.releases.is_empty());
        assert!(response.total_pages.is_none());
    }
}

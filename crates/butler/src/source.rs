//! [`ReleaseSource`] backed by the butler.

use async_trait::async_trait;
use metal_detector_core::error::CoreError;
use metal_detector_core::release::{DateRange, Release};
use metal_detector_core::traits::ReleaseSource;

use crate::api::ButlerApi;
use crate::models::ButlerReleasesRequest;

/// Service name reported in [`CoreError::ExternalService`].
const SERVICE: &str = "butler";

/// Fetches all releases of a range from the butler in one request.
pub struct ButlerReleaseSource {
    api: ButlerApi,
}

impl ButlerReleaseSource {
    pub fn new(api: ButlerApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ReleaseSource for ButlerReleaseSource {
    async fn find_releases(
        &self,
        artists: &[String],
        range: DateRange,
    ) -> Result<Vec<Release>, CoreError> {
        let request = ButlerReleasesRequest::unpaginated(artists, range);
        let response = self.api.query_releases(&request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                date_from = %range.from,
                date_to = ?range.to,
                "Butler releases query failed"
            );
            CoreError::external(SERVICE, e)
        })?;

        let releases: Vec<Release> = response.releases.into_iter().map(Release::from).collect();
        tracing::debug!(
            count = releases.len(),
            date_from = %range.from,
            date_to = ?range.to,
            "Fetched releases from butler"
        );
        Ok(releases)
    }
}

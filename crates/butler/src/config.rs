//! Butler client configuration.

use std::time::Duration;

/// Default timeout for a single releases query.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the butler HTTP client.
#[derive(Debug, Clone)]
pub struct ButlerConfig {
    /// Full URL of the unpaginated releases endpoint.
    pub releases_url: String,
    /// Optional bearer token sent with every request.
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl ButlerConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `BUTLER_RELEASES_URL` is not set.
    ///
    /// | Variable                | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `BUTLER_RELEASES_URL`   | yes      |         |
    /// | `BUTLER_ACCESS_TOKEN`   | no       |         |
    /// | `BUTLER_TIMEOUT_SECS`   | no       | `30`    |
    pub fn from_env() -> Option<Self> {
        let releases_url = std::env::var("BUTLER_RELEASES_URL").ok()?;
        Some(Self {
            releases_url,
            access_token: std::env::var("BUTLER_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(
                std::env::var("BUTLER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

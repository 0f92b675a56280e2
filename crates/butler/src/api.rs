//! REST API client for the butler releases endpoint.

use crate::config::ButlerConfig;
use crate::models::{ButlerReleasesRequest, ButlerReleasesResponse};

/// HTTP client for the release butler.
pub struct ButlerApi {
    client: reqwest::Client,
    config: ButlerConfig,
}

/// Errors from the butler REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ButlerApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The butler returned a non-2xx status code.
    #[error("Butler API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ButlerApi {
    /// Create a client with the configured request timeout.
    pub fn new(config: ButlerConfig) -> Result<Self, ButlerApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Query releases.
    ///
    /// Sends a `POST` to the releases endpoint with a JSON body and returns
    /// the parsed response.
    pub async fn query_releases(
        &self,
        request: &ButlerReleasesRequest,
    ) -> Result<ButlerReleasesResponse, ButlerApiError> {
        let mut builder = self
            .client
            .post(&self.config.releases_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request);

        if let Some(token) = &self.config.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ButlerApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ButlerApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ButlerApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ButlerApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

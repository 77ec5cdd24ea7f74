//! reqwest-backed JSON source

use super::{Endpoint, JsonSource, UpstreamError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest upstream error body quoted back in an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Fetches endpoints over HTTP(S)
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Create a source with the default timeout
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("price-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonSource for HttpSource {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, UpstreamError> {
        tracing::debug!(endpoint = %endpoint.name, url = %endpoint.url, "Requesting upstream");

        let mut request = self.client.get(&endpoint.url).query(&endpoint.query_params());
        for (name, value) in endpoint.header_pairs() {
            request = request.header(name, value);
        }

        // without_url: the URL may carry a query-string credential
        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::unavailable(&endpoint.name, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
            let reason = if excerpt.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {excerpt}")
            };
            return Err(UpstreamError::unavailable(&endpoint.name, reason));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::unavailable(&endpoint.name, e.without_url().to_string()))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::malformed(&endpoint.name, format!("invalid JSON: {e}")))
    }
}

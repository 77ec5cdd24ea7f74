//! Upstream price providers
//!
//! One configurable client replaces per-provider fetchers: an [`Endpoint`]
//! describes the URL, query, headers, credential and [`ResponseShape`], and
//! [`UpstreamClient::fetch`] turns it into a parsed [`Payload`].

mod endpoint;
mod http;
mod shape;
mod types;

pub use endpoint::{Credential, Endpoint};
pub use http::{HttpSource, DEFAULT_TIMEOUT};
pub use shape::ResponseShape;
pub use types::{CurrencyCode, CurrencyCodeList, CurrencyRates, MetalPrices, Payload, UpstreamError};

use crate::telemetry;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trait for anything that can produce the JSON body of an endpoint
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// Perform the request and decode the body as JSON
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, UpstreamError>;
}

/// Shared, cheaply cloneable upstream client
#[derive(Clone)]
pub struct UpstreamClient {
    source: Arc<dyn JsonSource>,
}

impl UpstreamClient {
    /// Create a client over any JSON source
    pub fn new(source: Arc<dyn JsonSource>) -> Self {
        Self { source }
    }

    /// Create an HTTP client with the given request timeout
    pub fn http(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(HttpSource::with_timeout(timeout)?)))
    }

    /// Call an endpoint and parse the response into its shape
    ///
    /// Every call goes to the upstream; nothing is cached or deduplicated.
    pub async fn fetch(&self, endpoint: &Endpoint) -> Result<Payload, UpstreamError> {
        let started = Instant::now();

        let result = match endpoint.check_credential() {
            Ok(()) => self
                .source
                .get_json(endpoint)
                .await
                .and_then(|body| endpoint.shape.parse(&endpoint.name, body)),
            Err(e) => Err(e),
        };

        let elapsed = started.elapsed();
        match &result {
            Ok(payload) => {
                telemetry::record_upstream(&endpoint.name, elapsed, "ok");
                tracing::debug!(
                    endpoint = %endpoint.name,
                    kind = payload.kind(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Upstream call succeeded"
                );
            }
            Err(e) => {
                telemetry::record_upstream(&endpoint.name, elapsed, e.label());
                tracing::warn!(
                    endpoint = %endpoint.name,
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Upstream call failed"
                );
            }
        }

        result
    }
}

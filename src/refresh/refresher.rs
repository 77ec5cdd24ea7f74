//! Refresh cycle: fetch, merge, publish

use super::RefreshOutcome;
use crate::config::{FailurePolicy, UpstreamConfig};
use crate::snapshot::{PriceSnapshot, SnapshotWriter};
use crate::telemetry::{self, CounterMetric, GaugeMetric, LatencyMetric};
use crate::upstream::{CurrencyRates, Endpoint, MetalPrices, UpstreamClient, UpstreamError};
use chrono::Utc;
use std::time::Instant;
use tokio::sync::Mutex;

/// The endpoints merged into every snapshot
#[derive(Debug, Clone)]
pub struct RefreshEndpoints {
    pub currency: Endpoint,
    pub metals: Endpoint,
}

impl RefreshEndpoints {
    /// Resolve both endpoints from config, reading credentials from the environment
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            currency: Endpoint::from_config("currency", &config.currency),
            metals: Endpoint::from_config("metals", &config.metals),
        }
    }
}

/// Owns the snapshot writer and republishes on every refresh
pub struct PriceRefresher {
    client: UpstreamClient,
    endpoints: RefreshEndpoints,
    writer: SnapshotWriter,
    policy: FailurePolicy,
    in_flight: Mutex<()>,
}

impl PriceRefresher {
    /// Create a refresher; it becomes the cell's only writer
    pub fn new(
        client: UpstreamClient,
        endpoints: RefreshEndpoints,
        writer: SnapshotWriter,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            client,
            endpoints,
            writer,
            policy,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one refresh cycle
    ///
    /// Skipped when another cycle is still in flight. Failures are logged and
    /// published as an error snapshot; they are never returned.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("Refresh already in flight, skipping");
            telemetry::increment_counter(CounterMetric::RefreshSkipped);
            return RefreshOutcome::Skipped;
        };

        let started = Instant::now();
        let result = self.fetch_all().await;
        let captured_at = Utc::now();

        let snapshot = match result {
            Ok((currencies, metals)) => {
                tracing::info!(
                    currencies = currencies.len(),
                    gold = metals.gold,
                    silver = metals.silver,
                    "Prices refreshed"
                );
                telemetry::increment_counter(CounterMetric::RefreshSucceeded);
                PriceSnapshot::fresh(captured_at, currencies, metals)
            }
            Err(e) => {
                tracing::error!(error = %e, policy = ?self.policy, "Price refresh failed");
                telemetry::increment_counter(CounterMetric::RefreshFailed);
                match self.policy {
                    FailurePolicy::Discard => PriceSnapshot::failed(captured_at, e.to_string()),
                    FailurePolicy::Retain => match self.writer.current().await {
                        Some(previous) => {
                            PriceSnapshot::failed_retaining(captured_at, e.to_string(), &previous)
                        }
                        None => PriceSnapshot::failed(captured_at, e.to_string()),
                    },
                }
            }
        };

        telemetry::set_gauge(
            GaugeMetric::CurrencyCount,
            snapshot.currencies.as_ref().map_or(0.0, |c| c.len() as f64),
        );
        telemetry::set_gauge(GaugeMetric::SnapshotStale, if snapshot.stale { 1.0 } else { 0.0 });

        let published = self.writer.publish(snapshot).await;
        telemetry::record_latency(LatencyMetric::RefreshCycle, started.elapsed());

        RefreshOutcome::Published(published)
    }

    /// Fetch every endpoint concurrently; the first error wins
    async fn fetch_all(&self) -> Result<(CurrencyRates, MetalPrices), UpstreamError> {
        let currency = &self.endpoints.currency;
        let metals = &self.endpoints.metals;

        let (currencies, metal_prices) =
            tokio::join!(self.client.fetch(currency), self.client.fetch(metals));

        let currencies = currencies?.into_rates(&currency.name)?;
        let metal_prices = metal_prices?.into_metals(&metals.name)?;
        Ok((currencies, metal_prices))
    }
}

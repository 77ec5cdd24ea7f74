//! Prometheus metrics

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// One full refresh cycle
    RefreshCycle,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Refresh cycle published fresh prices
    RefreshSucceeded,
    /// Refresh cycle published an error snapshot
    RefreshFailed,
    /// Refresh skipped because another was in flight
    RefreshSkipped,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Number of currencies in the current snapshot
    CurrencyCount,
    /// 1 when the current snapshot carries stale prices
    SnapshotStale,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::RefreshCycle => "pricedash_refresh_cycle_latency_ms",
        }
    }
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::RefreshSucceeded => "pricedash_refresh_succeeded_total",
            CounterMetric::RefreshFailed => "pricedash_refresh_failed_total",
            CounterMetric::RefreshSkipped => "pricedash_refresh_skipped_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::CurrencyCount => "pricedash_snapshot_currencies",
            GaugeMetric::SnapshotStale => "pricedash_snapshot_stale",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = metric.name();
    let value_ms = duration.as_secs_f64() * 1000.0;

    metrics::histogram!(metric_name).record(value_ms);
    tracing::trace!(metric = metric_name, value_ms, "Recording latency");
}

/// Record one upstream call and its outcome
pub fn record_upstream(endpoint: &str, duration: Duration, outcome: &'static str) {
    metrics::histogram!("pricedash_upstream_latency_ms", "endpoint" => endpoint.to_string())
        .record(duration.as_secs_f64() * 1000.0);
    metrics::counter!(
        "pricedash_upstream_requests_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = metric.name();
    metrics::gauge!(metric_name).set(value);
    tracing::trace!(metric = metric_name, value, "Setting gauge");
}

/// Install the Prometheus recorder and serve `/metrics` on the given port
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter on {}: {}", addr, e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

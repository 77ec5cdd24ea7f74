//! Fixed-interval refresh loop

use super::PriceRefresher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Refresh immediately, then every `every`, until `shutdown` flips to true
///
/// Cycles run one at a time; a tick missed while a slow cycle was running is
/// dropped rather than replayed.
pub async fn run_scheduled(
    refresher: Arc<PriceRefresher>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval_secs = every.as_secs(), "Price refresher started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                refresher.refresh().await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("Price refresher stopped");
}

//! Price refresher
//!
//! Periodically fetches currency rates and metal prices, merges them into one
//! [`PriceSnapshot`](crate::snapshot::PriceSnapshot) and publishes it.

mod refresher;
mod scheduler;

pub use refresher::{PriceRefresher, RefreshEndpoints};
pub use scheduler::run_scheduled;

use crate::snapshot::PriceSnapshot;
use std::sync::Arc;

/// Result of a call to [`PriceRefresher::refresh`]
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// A new snapshot was published (successful or error-tagged)
    Published(Arc<PriceSnapshot>),
    /// Another cycle was in flight
    Skipped,
}

impl RefreshOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, RefreshOutcome::Published(_))
    }
}

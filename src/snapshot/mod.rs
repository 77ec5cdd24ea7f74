//! Price snapshot
//!
//! The one piece of shared state: the latest merged currency and metals prices,
//! held in a single-writer cell and replaced wholesale on every refresh.

mod cell;

pub use cell::{snapshot_cell, SnapshotReader, SnapshotWriter};

use crate::upstream::{CurrencyRates, MetalPrices};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot lookup errors
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// Queried before the first refresh completed
    #[error("no data yet: the first price refresh has not completed")]
    NoDataYet,
}

/// Latest merged prices, or the error from the last refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    /// When the refresh that produced this snapshot ran
    pub captured_at: Option<DateTime<Utc>>,
    pub currencies: Option<CurrencyRates>,
    pub metals: Option<MetalPrices>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Prices were carried over from an earlier cycle
    #[serde(default)]
    pub stale: bool,
    /// When the prices in this snapshot were fetched
    pub last_success_at: Option<DateTime<Utc>>,
}

impl PriceSnapshot {
    /// A successful refresh
    pub fn fresh(at: DateTime<Utc>, currencies: CurrencyRates, metals: MetalPrices) -> Self {
        Self {
            captured_at: Some(at),
            currencies: Some(currencies),
            metals: Some(metals),
            error: None,
            stale: false,
            last_success_at: Some(at),
        }
    }

    /// A failed refresh with every price dropped
    pub fn failed(at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            captured_at: Some(at),
            currencies: None,
            metals: None,
            error: Some(error.into()),
            stale: false,
            last_success_at: None,
        }
    }

    /// A failed refresh that keeps the prices of `previous`
    ///
    /// Falls back to [`PriceSnapshot::failed`] when `previous` has no prices.
    pub fn failed_retaining(at: DateTime<Utc>, error: impl Into<String>, previous: &PriceSnapshot) -> Self {
        match (&previous.currencies, &previous.metals) {
            (Some(currencies), Some(metals)) => Self {
                captured_at: Some(at),
                currencies: Some(currencies.clone()),
                metals: Some(*metals),
                error: Some(error.into()),
                stale: true,
                last_success_at: previous.last_success_at,
            },
            _ => Self::failed(at, error),
        }
    }

    /// Served before any refresh has completed
    pub fn placeholder() -> Self {
        Self {
            captured_at: None,
            currencies: None,
            metals: None,
            error: Some(SnapshotError::NoDataYet.to_string()),
            stale: false,
            last_success_at: None,
        }
    }

    /// Whether this snapshot carries usable prices
    pub fn has_prices(&self) -> bool {
        self.currencies.is_some() && self.metals.is_some()
    }
}

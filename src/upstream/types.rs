//! Upstream payload and error types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Currency code to exchange rate
pub type CurrencyRates = BTreeMap<String, f64>;

/// Gold and silver spot prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetalPrices {
    pub gold: f64,
    pub silver: f64,
}

/// A supported currency and its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCode {
    pub code: String,
    pub name: String,
}

/// Normalized list of currency codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCodeList {
    pub supported_codes: Vec<CurrencyCode>,
}

/// Parsed result of one upstream call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Raw(Value),
    Rates(CurrencyRates),
    Metals(MetalPrices),
    Codes(CurrencyCodeList),
}

impl Payload {
    /// Short name of the payload kind, for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Raw(_) => "raw",
            Payload::Rates(_) => "rates",
            Payload::Metals(_) => "metals",
            Payload::Codes(_) => "codes",
        }
    }

    /// Take the currency rates out of this payload
    pub fn into_rates(self, endpoint: &str) -> Result<CurrencyRates, UpstreamError> {
        match self {
            Payload::Rates(rates) => Ok(rates),
            other => Err(UpstreamError::malformed(
                endpoint,
                format!("expected rates, got {}", other.kind()),
            )),
        }
    }

    /// Take the metal prices out of this payload
    pub fn into_metals(self, endpoint: &str) -> Result<MetalPrices, UpstreamError> {
        match self {
            Payload::Metals(metals) => Ok(metals),
            other => Err(UpstreamError::malformed(
                endpoint,
                format!("expected metals, got {}", other.kind()),
            )),
        }
    }
}

/// Upstream call errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// Network failure or non-2xx status
    #[error("{endpoint} unavailable: {reason}")]
    Unavailable { endpoint: String, reason: String },
    /// Body is not JSON or not the expected shape
    #[error("{endpoint} returned a malformed response: {reason}")]
    Malformed { endpoint: String, reason: String },
    /// Credential env var unset or empty
    #[error("{endpoint} is missing its credential (set {var})")]
    MissingCredential { endpoint: String, var: String },
}

impl UpstreamError {
    pub fn unavailable(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    /// Label used for the error counter
    pub fn label(&self) -> &'static str {
        match self {
            UpstreamError::Unavailable { .. } => "unavailable",
            UpstreamError::Malformed { .. } => "malformed",
            UpstreamError::MissingCredential { .. } => "missing_credential",
        }
    }
}

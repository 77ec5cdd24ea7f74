//! Configuration types for price-dashboard

use crate::telemetry::LogFormat;
use crate::upstream::ResponseShape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Env var that overrides `server.port`
pub const PORT_ENV: &str = "PORT";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    4000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Snapshot refresh configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshConfig {
    /// Seconds between refresh cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// What a failed cycle does to previously fetched prices
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

fn default_interval_secs() -> u64 {
    60
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            on_failure: FailurePolicy::default(),
        }
    }
}

/// Failure policy for refresh cycles
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Publish an error snapshot with no prices
    #[default]
    Discard,
    /// Keep the last good prices, flagged stale, alongside the error
    Retain,
}

/// Upstream provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Currency rates used by the refresher
    #[serde(default = "default_currency")]
    pub currency: ProviderConfig,

    /// Metal prices used by the refresher
    #[serde(default = "default_metals")]
    pub metals: ProviderConfig,

    /// Pass-through: live gold prices
    #[serde(default = "default_gold")]
    pub gold: ProviderConfig,

    /// Pass-through: supported currency codes
    #[serde(default = "default_currency_codes")]
    pub currency_codes: ProviderConfig,

    /// Pass-through: live currency rates
    #[serde(default = "default_currency_rates")]
    pub currency_rates: ProviderConfig,
}

fn default_timeout_secs() -> u64 {
    10
}

const RAPIDAPI_KEY_ENV: &str = "RAPIDAPI_KEY";
const RAPIDAPI_KEY_HEADER: &str = "X-RapidAPI-Key";
const RAPIDAPI_HOST_HEADER: &str = "X-RapidAPI-Host";

fn rapidapi(host: &str, path: &str, shape: ResponseShape) -> ProviderConfig {
    let mut headers = BTreeMap::new();
    headers.insert(RAPIDAPI_HOST_HEADER.to_string(), host.to_string());
    ProviderConfig {
        url: format!("https://{host}{path}"),
        query: BTreeMap::new(),
        headers,
        api_key_env: Some(RAPIDAPI_KEY_ENV.to_string()),
        api_key_header: Some(RAPIDAPI_KEY_HEADER.to_string()),
        api_key_query: None,
        shape,
    }
}

fn default_currency() -> ProviderConfig {
    ProviderConfig {
        url: "https://open.er-api.com/v6/latest/USD".to_string(),
        query: BTreeMap::new(),
        headers: BTreeMap::new(),
        api_key_env: None,
        api_key_header: None,
        api_key_query: None,
        shape: ResponseShape::Rates {
            pointer: "/rates".to_string(),
        },
    }
}

fn default_metals() -> ProviderConfig {
    let mut query = BTreeMap::new();
    query.insert("base".to_string(), "USD".to_string());
    query.insert("currencies".to_string(), "XAU,XAG".to_string());
    ProviderConfig {
        url: "https://api.metalpriceapi.com/v1/latest".to_string(),
        query,
        headers: BTreeMap::new(),
        api_key_env: Some("METALPRICE_API_KEY".to_string()),
        api_key_header: None,
        api_key_query: Some("api_key".to_string()),
        shape: ResponseShape::Metals {
            gold: "/rates/USDXAU".to_string(),
            silver: "/rates/USDXAG".to_string(),
        },
    }
}

fn default_gold() -> ProviderConfig {
    rapidapi(
        "gold-price-live.p.rapidapi.com",
        "/get_metal_prices",
        ResponseShape::Raw,
    )
}

fn default_currency_codes() -> ProviderConfig {
    rapidapi(
        "currency-conversion-and-exchange-rates.p.rapidapi.com",
        "/symbols",
        ResponseShape::Codes {
            pointer: "/symbols".to_string(),
        },
    )
}

fn default_currency_rates() -> ProviderConfig {
    let mut config = rapidapi(
        "currency-conversion-and-exchange-rates.p.rapidapi.com",
        "/latest",
        ResponseShape::Rates {
            pointer: "/rates".to_string(),
        },
    );
    config.query.insert("base".to_string(), "USD".to_string());
    config
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            currency: default_currency(),
            metals: default_metals(),
            gold: default_gold(),
            currency_codes: default_currency_codes(),
            currency_rates: default_currency_rates(),
        }
    }
}

/// One upstream endpoint: where to call and how to read the answer
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub url: String,

    #[serde(default)]
    pub query: BTreeMap<String, String>,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Name of the env var holding the API key, if one is needed
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Send the key in this header
    #[serde(default)]
    pub api_key_header: Option<String>,

    /// Send the key as this query parameter (used when no header is set)
    #[serde(default)]
    pub api_key_query: Option<String>,

    #[serde(default)]
    pub shape: ResponseShape,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_env_with(|var| std::env::var(var).ok())
    }

    /// Apply overrides using a custom env lookup
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid {PORT_ENV} {port:?}: {e}"))?;
        }
        Ok(())
    }

    /// Socket address string for the HTTP server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

//! CLI interface for price-dashboard
//!
//! Provides subcommands for:
//! - `serve`: Run the refresher and HTTP server
//! - `fetch`: One-shot refresh or pass-through call, printed as JSON
//! - `config`: Show the effective configuration

mod fetch;
mod serve;

pub use fetch::FetchArgs;
pub use serve::ServeArgs;

use crate::config::Config;
use crate::refresh::RefreshEndpoints;
use crate::server::PassthroughEndpoints;
use crate::upstream::{Credential, Endpoint};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "price-dashboard")]
#[command(about = "Live currency and metals price cache with a small REST API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the price refresher and HTTP server
    Serve(ServeArgs),
    /// Fetch once and print the result as JSON
    Fetch(FetchArgs),
    /// Show the effective configuration
    Config,
}

/// Print the effective configuration; credentials are reported, never shown
pub fn print_config(config: &Config) {
    let refresh = RefreshEndpoints::from_config(&config.upstream);
    let passthrough = PassthroughEndpoints::from_config(&config.upstream);

    println!("Current configuration:");
    println!("  Server: {}", config.bind_addr());
    println!(
        "  Refresh: every {}s, on failure: {:?}",
        config.refresh.interval_secs, config.refresh.on_failure
    );
    println!("  Upstream timeout: {}s", config.upstream.timeout_secs);
    for endpoint in [
        &refresh.currency,
        &refresh.metals,
        &passthrough.gold,
        &passthrough.currency_codes,
        &passthrough.currency_rates,
    ] {
        println!("  {}", describe_endpoint(endpoint));
    }
    println!(
        "  Telemetry: level={}, format={:?}, metrics_port={}",
        config.telemetry.log_level,
        config.telemetry.log_format,
        config
            .telemetry
            .metrics_port
            .map_or_else(|| "off".to_string(), |p| p.to_string())
    );
}

fn describe_endpoint(endpoint: &Endpoint) -> String {
    let credential = match &endpoint.credential {
        None => "no key needed".to_string(),
        Some(Credential::Missing { var }) => format!("MISSING {var}"),
        Some(_) => "key set".to_string(),
    };
    format!("{}: {} ({})", endpoint.name, endpoint.url, credential)
}

/// Log every endpoint whose credential is missing
pub(crate) fn warn_missing_credentials<'a>(endpoints: impl IntoIterator<Item = &'a Endpoint>) {
    for endpoint in endpoints {
        if let Some(Credential::Missing { var }) = &endpoint.credential {
            tracing::warn!(
                endpoint = %endpoint.name,
                env = %var,
                "Credential not set; calls to this endpoint will fail"
            );
        }
    }
}

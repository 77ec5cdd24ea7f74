//! Fetch command implementation

use crate::config::Config;
use crate::refresh::{PriceRefresher, RefreshEndpoints};
use crate::server::{Category, ErrorBody, PassthroughEndpoints};
use crate::snapshot::snapshot_cell;
use crate::upstream::UpstreamClient;
use clap::Args;
use serde::Serialize;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Pass-through category to call; omit to run one refresh cycle
    #[arg(value_enum)]
    pub category: Option<Category>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl FetchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = UpstreamClient::http(Duration::from_secs(config.upstream.timeout_secs))?;

        match self.category {
            None => {
                let (writer, reader) = snapshot_cell();
                let refresher = PriceRefresher::new(
                    client,
                    RefreshEndpoints::from_config(&config.upstream),
                    writer,
                    config.refresh.on_failure,
                );
                refresher.refresh().await;

                let snapshot = reader.latest_or_placeholder().await;
                self.print(&*snapshot)?;
                if let Some(error) = &snapshot.error {
                    anyhow::bail!("Refresh failed: {}", error);
                }
            }
            Some(category) => {
                let endpoints = PassthroughEndpoints::from_config(&config.upstream);
                match client.fetch(endpoints.get(category)).await {
                    Ok(payload) => self.print(&payload)?,
                    Err(e) => {
                        self.print(&ErrorBody { error: e.to_string() })?;
                        return Err(e.into());
                    }
                }
            }
        }

        Ok(())
    }

    fn print<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{json}");
        Ok(())
    }
}

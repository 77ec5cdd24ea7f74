//! Serve command implementation

use super::warn_missing_credentials;
use crate::config::Config;
use crate::refresh::{run_scheduled, PriceRefresher, RefreshEndpoints};
use crate::server::{self, AppState, PassthroughEndpoints};
use crate::snapshot::snapshot_cell;
use crate::upstream::UpstreamClient;
use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let client = UpstreamClient::http(Duration::from_secs(config.upstream.timeout_secs))?;
        let refresh_endpoints = RefreshEndpoints::from_config(&config.upstream);
        let passthrough = PassthroughEndpoints::from_config(&config.upstream);
        warn_missing_credentials([
            &refresh_endpoints.currency,
            &refresh_endpoints.metals,
            &passthrough.gold,
            &passthrough.currency_codes,
            &passthrough.currency_rates,
        ]);

        let (writer, reader) = snapshot_cell();
        let refresher = Arc::new(PriceRefresher::new(
            client.clone(),
            refresh_endpoints,
            writer,
            config.refresh.on_failure,
        ));
        let state = AppState::new(reader, client, passthrough);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let interval = Duration::from_secs(config.refresh.interval_secs.max(1));
        let refresh_task = tokio::spawn(run_scheduled(refresher, interval, shutdown_rx));

        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;

        let shutdown = async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown requested");
            let _ = shutdown_tx.send(true);
        };

        server::serve(listener, state, shutdown).await?;
        refresh_task.await?;

        Ok(())
    }
}

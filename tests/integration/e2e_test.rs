//! End-to-end tests: config file to running server

use crate::support::{metals_shape, rates_shape, ScriptedSource};
use price_dashboard::config::{Config, FailurePolicy};
use price_dashboard::refresh::{run_scheduled, PriceRefresher, RefreshEndpoints};
use price_dashboard::server::{serve, AppState, PassthroughEndpoints};
use price_dashboard::snapshot::snapshot_cell;
use price_dashboard::upstream::{Endpoint, UpstreamClient};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[test]
fn test_config_example_exists() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.refresh.on_failure, FailurePolicy::Discard);
    assert_eq!(config.upstream.gold.api_key_env.as_deref(), Some("RAPIDAPI_KEY"));
}

#[tokio::test]
async fn test_served_over_tcp() {
    let source = Arc::new(ScriptedSource::default());
    source.set("currency", Ok(json!({"rates": {"EUR": 0.9, "EGP": 48.5}})));
    source.set("metals", Ok(json!({"gold": 2315.4, "silver": 27.31})));

    let client = UpstreamClient::new(source);
    let (writer, reader) = snapshot_cell();
    let endpoints = RefreshEndpoints {
        currency: Endpoint::new("currency", "http://unused", rates_shape()),
        metals: Endpoint::new("metals", "http://unused", metals_shape()),
    };
    let refresher = Arc::new(PriceRefresher::new(
        client.clone(),
        endpoints,
        writer,
        FailurePolicy::Discard,
    ));
    let state = AppState::new(
        reader.clone(),
        client,
        PassthroughEndpoints::from_config(&Config::default().upstream),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_task = tokio::spawn(run_scheduled(refresher, Duration::from_secs(60), shutdown_rx.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let mut server_shutdown = shutdown_rx;
    let server_task = tokio::spawn(serve(listener, state, async move {
        let _ = server_shutdown.wait_for(|stop| *stop).await;
    }));

    // Wait for the startup refresh
    for _ in 0..50 {
        if reader.latest().await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let http = reqwest::Client::new();
    let health: Value = http
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({"status": "API is working"}));

    let prices: Value = http
        .get(format!("http://{addr}/prices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(prices["currencies"]["EUR"], json!(0.9));
    assert_eq!(prices["metals"]["silver"], json!(27.31));
    drop(http);

    shutdown_tx.send(true).unwrap();
    server_task.await.unwrap().unwrap();
    refresh_task.await.unwrap();
}

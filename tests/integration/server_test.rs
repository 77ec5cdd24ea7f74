//! Integration tests for the HTTP routes

use crate::support::{get_json, metals_shape, rates_shape, FailFirstSource, ScriptedSource};
use axum::http::StatusCode;
use price_dashboard::config::FailurePolicy;
use price_dashboard::refresh::{PriceRefresher, RefreshEndpoints};
use price_dashboard::server::{build_router, live_upstream, AppState, Category, PassthroughEndpoints};
use price_dashboard::snapshot::snapshot_cell;
use price_dashboard::upstream::{Endpoint, Payload, ResponseShape, UpstreamClient, UpstreamError};
use serde_json::json;
use std::sync::Arc;

fn passthrough() -> PassthroughEndpoints {
    PassthroughEndpoints {
        gold: Endpoint::new("gold", "http://unused/gold", ResponseShape::Raw),
        currency_codes: Endpoint::new(
            "currency_codes",
            "http://unused/codes",
            ResponseShape::Codes {
                pointer: String::new(),
            },
        ),
        currency_rates: Endpoint::new("currency_rates", "http://unused/rates", rates_shape()),
    }
}

fn refresh_endpoints() -> RefreshEndpoints {
    RefreshEndpoints {
        currency: Endpoint::new("currency", "http://unused/currency", rates_shape()),
        metals: Endpoint::new("metals", "http://unused/metals", metals_shape()),
    }
}

/// Wire a refresher and server state to the same scripted source
fn setup(source: Arc<ScriptedSource>) -> (PriceRefresher, AppState) {
    let client = UpstreamClient::new(source);
    let (writer, reader) = snapshot_cell();
    let refresher = PriceRefresher::new(client.clone(), refresh_endpoints(), writer, FailurePolicy::Discard);
    let state = AppState::new(reader, client, passthrough());
    (refresher, state)
}

#[tokio::test]
async fn test_health_is_fixed() {
    let (_refresher, state) = setup(Arc::new(ScriptedSource::default()));

    let (status, body) = get_json(build_router(state), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "API is working"}));
}

#[tokio::test]
async fn test_health_ignores_snapshot_state() {
    let source = Arc::new(ScriptedSource::default());
    let (refresher, state) = setup(source);
    // Every upstream is unscripted, so the refresh fails
    refresher.refresh().await;

    let (status, body) = get_json(build_router(state), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "API is working");
}

#[tokio::test]
async fn test_prices_before_first_refresh() {
    let (_refresher, state) = setup(Arc::new(ScriptedSource::default()));

    let (status, body) = get_json(build_router(state), "/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["currencies"].is_null());
    assert!(body["metals"].is_null());
    assert!(body["error"].as_str().unwrap().starts_with("no data yet"));
}

#[tokio::test]
async fn test_prices_after_refresh() {
    let source = Arc::new(ScriptedSource::default());
    source.set("currency", Ok(json!({"rates": {"EUR": 0.9, "EGP": 48.5}})));
    source.set("metals", Ok(json!({"gold": 2315.4, "silver": 27.31})));
    let (refresher, state) = setup(source);

    refresher.refresh().await;

    let (status, body) = get_json(build_router(state), "/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currencies"]["EUR"], json!(0.9));
    assert_eq!(body["currencies"]["EGP"], json!(48.5));
    assert_eq!(body["metals"], json!({"gold": 2315.4, "silver": 27.31}));
    assert!(body.get("error").is_none());
    assert!(body["capturedAt"].is_string());
}

#[tokio::test]
async fn test_prices_after_failed_refresh() {
    let source = Arc::new(ScriptedSource::default());
    source.set("currency", Err(UpstreamError::unavailable("currency", "HTTP 500")));
    source.set("metals", Ok(json!({"gold": 2315.4, "silver": 27.31})));
    let (refresher, state) = setup(source);

    refresher.refresh().await;

    let (status, body) = get_json(build_router(state), "/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["currencies"].is_null());
    assert!(body["metals"].is_null());
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_passthrough_success() {
    let source = Arc::new(ScriptedSource::default());
    source.set("gold", Ok(json!({"status": "success", "gold": "2315.40"})));
    source.set("currency_codes", Ok(json!([["USD", "US Dollar"], ["EGP", "Egyptian Pound"]])));
    source.set("currency_rates", Ok(json!({"base": "USD", "rates": {"EUR": 0.92}})));
    let (_refresher, state) = setup(source);
    let app = build_router(state);

    let (status, body) = get_json(app.clone(), "/gold-rapidapi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "gold": "2315.40"}));

    let (status, body) = get_json(app.clone(), "/currency-codes-rapidapi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supported_codes"][1], json!({"code": "EGP", "name": "Egyptian Pound"}));

    let (status, body) = get_json(app, "/currency-rates-rapidapi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"EUR": 0.92}));
}

#[tokio::test]
async fn test_passthrough_failure_is_json_500() {
    let source = Arc::new(ScriptedSource::default());
    source.set("gold", Err(UpstreamError::unavailable("gold", "HTTP 503 Service Unavailable")));
    let (_refresher, state) = setup(source);

    let (status, body) = get_json(build_router(state), "/gold-rapidapi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "gold unavailable: HTTP 503 Service Unavailable"}));
}

#[tokio::test]
async fn test_passthrough_does_not_touch_snapshot() {
    let source = Arc::new(ScriptedSource::default());
    source.set("currency_rates", Err(UpstreamError::unavailable("currency_rates", "down")));
    let (_refresher, state) = setup(source);
    let app = build_router(state);

    let (status, _) = get_json(app.clone(), "/currency-rates-rapidapi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = get_json(app, "/prices").await;
    assert!(body["error"].as_str().unwrap().starts_with("no data yet"));
}

#[tokio::test]
async fn test_concurrent_passthrough_calls_are_independent() {
    let source = Arc::new(ScriptedSource::default());
    source.set("gold", Ok(json!({"gold": 2315.4})));
    let (_refresher, state) = setup(source.clone());

    let (a, b) = tokio::join!(
        live_upstream(&state, Category::Gold),
        live_upstream(&state, Category::Gold)
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    // No shared cache: both requests reached upstream
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_failure_does_not_leak_into_other_call() {
    let source = Arc::new(FailFirstSource::new(json!({"gold": 2315.4})));
    let client = UpstreamClient::new(source.clone());
    let (_writer, reader) = snapshot_cell();
    let state = AppState::new(reader, client, passthrough());

    let (a, b) = tokio::join!(
        live_upstream(&state, Category::Gold),
        live_upstream(&state, Category::Gold)
    );
    assert_eq!(source.calls(), 2);

    let (failed, succeeded) = match (a, b) {
        (Err(e), Ok(body)) | (Ok(body), Err(e)) => (e, body),
        (a, b) => panic!("expected one failure and one success, got {a:?} and {b:?}"),
    };
    assert_eq!(succeeded.0, Payload::Raw(json!({"gold": 2315.4})));

    let response = axum::response::IntoResponse::into_response(failed);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_missing_credential_is_reported() {
    let source = Arc::new(ScriptedSource::default());
    let (_refresher, mut state) = setup(source.clone());
    let mut endpoints = passthrough();
    endpoints.gold.credential = Some(price_dashboard::upstream::Credential::Missing {
        var: "RAPIDAPI_KEY".to_string(),
    });
    state.passthrough = Arc::new(endpoints);

    let (status, body) = get_json(build_router(state), "/gold-rapidapi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("RAPIDAPI_KEY"));
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_unknown_route() {
    let (_refresher, state) = setup(Arc::new(ScriptedSource::default()));
    let app = build_router(state);

    use tower::ServiceExt;
    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/nope")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

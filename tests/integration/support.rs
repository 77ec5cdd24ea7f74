//! Shared test fixtures

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use price_dashboard::upstream::{Endpoint, JsonSource, ResponseShape, UpstreamError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tower::ServiceExt;

/// JSON source answering by endpoint name, counting calls
#[derive(Default)]
pub struct ScriptedSource {
    bodies: Mutex<HashMap<String, Result<Value, UpstreamError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn set(&self, name: &str, body: Result<Value, UpstreamError>) {
        self.bodies.lock().unwrap().insert(name.to_string(), body);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JsonSource for ScriptedSource {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers interleave
        tokio::task::yield_now().await;
        self.bodies
            .lock()
            .unwrap()
            .get(&endpoint.name)
            .cloned()
            .unwrap_or_else(|| Err(UpstreamError::unavailable(&endpoint.name, "not scripted")))
    }
}

/// JSON source that fails its first call and answers every later one
pub struct FailFirstSource {
    body: Value,
    calls: AtomicUsize,
}

impl FailFirstSource {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JsonSource for FailFirstSource {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, UpstreamError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if call == 0 {
            Err(UpstreamError::unavailable(&endpoint.name, "HTTP 502 Bad Gateway"))
        } else {
            Ok(self.body.clone())
        }
    }
}

pub fn rates_shape() -> ResponseShape {
    ResponseShape::Rates {
        pointer: "/rates".to_string(),
    }
}

pub fn metals_shape() -> ResponseShape {
    ResponseShape::Metals {
        gold: "/gold".to_string(),
        silver: "/silver".to_string(),
    }
}

/// Send a GET through the router and decode the JSON body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

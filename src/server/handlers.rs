//! Route handlers

use super::{ApiError, AppState, Category};
use crate::upstream::Payload;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Fixed liveness message
pub const HEALTH_STATUS: &str = "API is working";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS,
    })
}

/// GET /prices
pub async fn prices(State(state): State<AppState>) -> Response {
    let snapshot = state.snapshots.latest_or_placeholder().await;
    Json(&*snapshot).into_response()
}

/// GET /gold-rapidapi
pub async fn gold(State(state): State<AppState>) -> Result<Json<Payload>, ApiError> {
    live_upstream(&state, Category::Gold).await
}

/// GET /currency-codes-rapidapi
pub async fn currency_codes(State(state): State<AppState>) -> Result<Json<Payload>, ApiError> {
    live_upstream(&state, Category::CurrencyCodes).await
}

/// GET /currency-rates-rapidapi
pub async fn currency_rates(State(state): State<AppState>) -> Result<Json<Payload>, ApiError> {
    live_upstream(&state, Category::CurrencyRates).await
}

/// Call the category's upstream for this request only
pub async fn live_upstream(state: &AppState, category: Category) -> Result<Json<Payload>, ApiError> {
    let endpoint = state.passthrough.get(category);
    let payload = state.client.fetch(endpoint).await?;
    Ok(Json(payload))
}

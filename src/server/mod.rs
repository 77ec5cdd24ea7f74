//! Snapshot server
//!
//! Read access to the cached snapshot, a liveness probe, and pass-through
//! routes that call an upstream on every request.

mod error;
mod handlers;
mod passthrough;
mod state;

pub use error::{ApiError, ErrorBody};
pub use handlers::{live_upstream, HealthResponse, HEALTH_STATUS};
pub use passthrough::{Category, PassthroughEndpoints};
pub use state::AppState;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the router with every route and middleware
pub fn build_router(state: AppState) -> Router {
    // The dashboard is served from another origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/prices", get(handlers::prices))
        .route(Category::Gold.path(), get(handlers::gold))
        .route(Category::CurrencyCodes.path(), get(handlers::currency_codes))
        .route(Category::CurrencyRates.path(), get(handlers::currency_rates))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Server running on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

//! price-dashboard: live currency and metals price cache
//!
//! This library provides the core components for:
//! - A configurable upstream client for third-party price APIs
//! - A single-writer snapshot cell holding the latest merged prices
//! - A scheduled refresher that republishes the snapshot on a fixed interval
//! - A small REST server over the snapshot plus live pass-through routes
//! - Logging and metrics

pub mod cli;
pub mod config;
pub mod refresh;
pub mod server;
pub mod snapshot;
pub mod telemetry;
pub mod upstream;

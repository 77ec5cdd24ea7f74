//! Shared handler state

use super::PassthroughEndpoints;
use crate::snapshot::SnapshotReader;
use crate::upstream::UpstreamClient;
use std::sync::Arc;

/// State handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotReader,
    pub client: UpstreamClient,
    pub passthrough: Arc<PassthroughEndpoints>,
}

impl AppState {
    pub fn new(snapshots: SnapshotReader, client: UpstreamClient, passthrough: PassthroughEndpoints) -> Self {
        Self {
            snapshots,
            client,
            passthrough: Arc::new(passthrough),
        }
    }
}

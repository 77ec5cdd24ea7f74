//! Single-writer snapshot cell

use super::{PriceSnapshot, SnapshotError};
use std::sync::Arc;
use tokio::sync::RwLock;

type Slot = Arc<RwLock<Option<Arc<PriceSnapshot>>>>;

/// Create a new empty cell
///
/// There is exactly one writer; readers can be cloned freely.
pub fn snapshot_cell() -> (SnapshotWriter, SnapshotReader) {
    let slot: Slot = Arc::new(RwLock::new(None));
    (
        SnapshotWriter { slot: slot.clone() },
        SnapshotReader { slot },
    )
}

/// The only handle that can publish snapshots
#[derive(Debug)]
pub struct SnapshotWriter {
    slot: Slot,
}

impl SnapshotWriter {
    /// Replace the current snapshot
    pub async fn publish(&self, snapshot: PriceSnapshot) -> Arc<PriceSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut slot = self.slot.write().await;
        *slot = Some(snapshot.clone());
        snapshot
    }

    /// The snapshot most recently published
    pub async fn current(&self) -> Option<Arc<PriceSnapshot>> {
        self.slot.read().await.clone()
    }
}

/// Read-only handle onto the snapshot cell
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Slot,
}

impl SnapshotReader {
    /// The latest snapshot, or [`SnapshotError::NoDataYet`]
    pub async fn latest(&self) -> Result<Arc<PriceSnapshot>, SnapshotError> {
        self.slot.read().await.clone().ok_or(SnapshotError::NoDataYet)
    }

    /// The latest snapshot, or a "no data yet" placeholder
    pub async fn latest_or_placeholder(&self) -> Arc<PriceSnapshot> {
        match self.latest().await {
            Ok(snapshot) => snapshot,
            Err(_) => Arc::new(PriceSnapshot::placeholder()),
        }
    }
}

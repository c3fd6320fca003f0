//! Latest authoritative snapshot slot

use std::sync::Arc;

use crate::ws::protocol::Snapshot;

/// Holds the most recent snapshot. Replacing it is a single assignment, so
/// a frame never observes a half-updated snapshot.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    latest: Option<Arc<Snapshot>>,
    /// Snapshots received so far
    received: u64,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede whatever was there
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.latest = Some(Arc::new(snapshot));
        self.received += 1;
    }

    /// Shared handle to the latest snapshot, if one has arrived
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.clone()
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}

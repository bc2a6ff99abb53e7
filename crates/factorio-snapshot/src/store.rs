//! SnapshotStore — holds the latest good snapshot and the last load error.
//!
//! The store does no locking of its own. Callers share it behind the scrape
//! coordinator's mutex, so readers only ever see whole snapshots.

use std::sync::Arc;

use tracing::debug;

use crate::error::LoadError;
use crate::snapshot::Snapshot;

/// The most recently installed snapshot plus bookkeeping about loads.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<Arc<Snapshot>>,
    last_error: Option<String>,
    loads: u64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `snapshot` as current, replacing the previous one wholesale.
    /// Clears any recorded load error.
    pub fn replace(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.current = Some(Arc::clone(&snapshot));
        self.last_error = None;
        self.loads += 1;
        debug!(loads = self.loads, "snapshot replaced");
        snapshot
    }

    /// The latest installed snapshot, if any load has succeeded yet.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    /// Remember a failed load. The current snapshot is left untouched.
    pub fn record_error(&mut self, error: &LoadError) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of successful loads installed so far.
    pub const fn loads(&self) -> u64 {
        self.loads
    }
}

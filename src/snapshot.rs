use std::sync::Arc;

use tokio::sync::watch;

use crate::metrics::MetricSnapshot;

/// Holds the latest published snapshot and notifies subscribers on every
/// replacement.
///
/// Replacement swaps the whole `Arc`, so readers see either the previous
/// snapshot or the new one, never a mix.
pub struct SnapshotStore {
    tx: Arc<watch::Sender<Arc<MetricSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(MetricSnapshot::new()));
        Self { tx: Arc::new(tx) }
    }

    pub fn replace(&self, snapshot: MetricSnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    pub fn current(&self) -> Arc<MetricSnapshot> {
        Arc::clone(&*self.tx.borrow())
    }

    /// A receiver that wakes once per replacement. The value seen at
    /// subscription time counts as already observed.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MetricSnapshot>> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SnapshotStore {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

//! Graph store port and the in-memory reference store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::node::{ChangeMessage, GraphUpdate, NodeFragment};
use crate::soul::Soul;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Port to the replicated graph store.
///
/// The indexer consumes exactly three operations: point reads, combined
/// writes, and the change-notification stream. Replication, conflict
/// resolution, and transport all stay behind this trait.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Fetch one node. Absence is a normal result, not an error.
    async fn get(&self, soul: &Soul) -> Result<Option<NodeFragment>>;

    /// Submit one combined write and await acknowledgment.
    async fn put(&self, update: GraphUpdate) -> Result<()>;

    /// Subscribe to change notifications for subsequent writes.
    fn subscribe(&self) -> broadcast::Receiver<ChangeMessage>;
}

/// In-memory reference implementation of [`GraphStore`].
///
/// Writes merge field-by-field into the stored node; writing JSON `null`
/// removes a field. Every acknowledged write is broadcast to subscribers
/// as a change notification. Backs the test suite and embeddings that
/// bring their own transport.
pub struct MemoryGraphStore {
    nodes: DashMap<Soul, NodeFragment>,
    changes: broadcast::Sender<ChangeMessage>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            nodes: DashMap::new(),
            changes,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `get` calls served so far (diagnostics).
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of `put` calls acknowledged so far (diagnostics).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Synchronous peek at a stored node.
    pub fn node(&self, soul: &Soul) -> Option<NodeFragment> {
        self.nodes.get(soul).map(|n| n.clone())
    }
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn get(&self, soul: &Soul) -> Result<Option<NodeFragment>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.nodes.get(soul).map(|n| n.clone()))
    }

    async fn put(&self, update: GraphUpdate) -> Result<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);

        for (soul, fragment) in &update {
            let mut node = self.nodes.entry(soul.clone()).or_default();
            for (key, value) in fragment {
                if value.is_null() {
                    node.shift_remove(key);
                } else {
                    node.insert(key.clone(), value.clone());
                }
            }
        }

        // Nobody listening is fine; the write itself already landed.
        let _ = self.changes.send(ChangeMessage::new(update));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeMessage> {
        self.changes.subscribe()
    }
}

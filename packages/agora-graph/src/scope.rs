//! Per-job cached read context.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::error::{GraphError, Result};
use crate::node::NodeFragment;
use crate::soul::Soul;
use crate::store::GraphStore;

/// Read bound applied to every store fetch a scope performs.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(2000);

/// A short-lived read context bound to one indexing job.
///
/// Reads go through a per-job cache. Absent nodes are cached as absent,
/// so repeated misses cost one store round trip. Every fetch is bounded
/// by the read timeout: a dead store fails the job instead of hanging
/// it. The scope must be released when the job ends, on every exit path;
/// dropping an unreleased scope logs a leak warning.
pub struct Scope {
    store: Arc<dyn GraphStore>,
    cache: Mutex<HashMap<Soul, Option<NodeFragment>>>,
    read_timeout: Duration,
    released: AtomicBool,
}

impl Scope {
    pub fn new(store: Arc<dyn GraphStore>, read_timeout: Duration) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
            read_timeout,
            released: AtomicBool::new(false),
        }
    }

    /// Cached point read of one node.
    pub async fn get(&self, soul: &Soul) -> Result<Option<NodeFragment>> {
        if self.released.load(Ordering::Acquire) {
            return Err(GraphError::ScopeReleased);
        }

        if let Some(cached) = self.cache.lock().get(soul) {
            return Ok(cached.clone());
        }

        let fetched = tokio::time::timeout(self.read_timeout, self.store.get(soul))
            .await
            .map_err(|_| GraphError::ReadTimeout {
                soul: soul.to_string(),
                timeout_ms: self.read_timeout.as_millis() as u64,
            })??;

        self.cache.lock().insert(soul.clone(), fetched.clone());
        Ok(fetched)
    }

    /// Tear the scope down, dropping its cache. Idempotent.
    pub fn release(&self) {
        self.released.store(true, Ordering::Release);
        self.cache.lock().clear();
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !self.released.load(Ordering::Acquire) {
            warn!("scope dropped without release");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::GraphUpdate;
    use crate::store::MemoryGraphStore;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::broadcast;

    fn seeded_store() -> Arc<MemoryGraphStore> {
        Arc::new(MemoryGraphStore::new())
    }

    async fn seed(store: &MemoryGraphStore, soul: Soul) {
        let mut update = GraphUpdate::new();
        let mut fragment = crate::node::NodeFragment::new();
        fragment.insert("kind".to_string(), json!("submission"));
        update.insert(soul, fragment);
        store.put(update).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_reads_through_cache() {
        let store = seeded_store();
        let soul = Soul::thing("abc");
        seed(&store, soul.clone()).await;

        let scope = Scope::new(store.clone(), DEFAULT_READ_TIMEOUT);
        let first = scope.get(&soul).await.unwrap();
        let second = scope.get(&soul).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.read_count(), 1);
        scope.release();
    }

    #[tokio::test]
    async fn test_absent_nodes_are_cached_too() {
        let store = seeded_store();
        let soul = Soul::thing("missing");

        let scope = Scope::new(store.clone(), DEFAULT_READ_TIMEOUT);
        assert!(scope.get(&soul).await.unwrap().is_none());
        assert!(scope.get(&soul).await.unwrap().is_none());

        assert_eq!(store.read_count(), 1);
        scope.release();
    }

    #[tokio::test]
    async fn test_released_scope_refuses_reads() {
        let store = seeded_store();
        let scope = Scope::new(store, DEFAULT_READ_TIMEOUT);
        scope.release();

        let err = scope.get(&Soul::thing("abc")).await.unwrap_err();
        assert!(matches!(err, GraphError::ScopeReleased));
    }

    /// Store whose reads never complete, to exercise the read bound.
    struct StalledStore {
        changes: broadcast::Sender<crate::node::ChangeMessage>,
    }

    impl StalledStore {
        fn new() -> Self {
            let (changes, _) = broadcast::channel(1);
            Self { changes }
        }
    }

    #[async_trait]
    impl GraphStore for StalledStore {
        async fn get(&self, _soul: &Soul) -> crate::error::Result<Option<NodeFragment>> {
            futures::future::pending().await
        }

        async fn put(&self, _update: GraphUpdate) -> crate::error::Result<()> {
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<crate::node::ChangeMessage> {
            self.changes.subscribe()
        }
    }

    #[tokio::test]
    async fn test_read_timeout_surfaces_as_error() {
        let scope = Scope::new(Arc::new(StalledStore::new()), Duration::from_millis(20));

        let err = scope.get(&Soul::thing("abc")).await.unwrap_err();
        assert!(matches!(err, GraphError::ReadTimeout { .. }));
        scope.release();
    }
}

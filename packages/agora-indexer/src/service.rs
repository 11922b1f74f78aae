//! Long-lived indexer service.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use agora_graph::{ChangeMessage, GraphStore};

use crate::change_filter::ids_to_index;
use crate::config::IndexerConfig;
use crate::queue::ProcessQueue;
use crate::writer::index_thing;

/// Owns the process-wide indexing state (the store handle, the
/// configuration, and the dedup process queue), constructed once at
/// startup and passed by handle wherever it is needed.
pub struct ListingIndexer {
    store: Arc<dyn GraphStore>,
    config: Arc<IndexerConfig>,
    queue: ProcessQueue,
}

impl ListingIndexer {
    pub fn new(store: Arc<dyn GraphStore>, config: IndexerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            queue: ProcessQueue::new(),
        }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Handle one change notification: filter out the touched content
    /// ids, enqueue them, and trigger a drain.
    pub async fn handle_change(&self, msg: &ChangeMessage) {
        let ids = ids_to_index(msg, &self.config.tabulator);
        if !ids.is_empty() {
            debug!("change touches {} thing(s)", ids.len());
            self.queue.enqueue_many(ids);
        }
        self.process().await;
    }

    /// Drain pending ids through the indexing job. Coalesces with an
    /// already-running drain.
    pub async fn process(&self) {
        let store = &self.store;
        let config = &self.config;
        self.queue
            .process(|id| async move { index_thing(store, config, &id).await })
            .await;
    }

    /// Consume the store's change stream until it closes.
    ///
    /// A lagged subscriber drops notifications with a warning; the items
    /// they covered get reindexed on their next change.
    pub async fn run(&self) {
        let mut changes = self.store.subscribe();
        info!("listing indexer running (tabulator {})", self.config.tabulator);

        loop {
            match changes.recv().await {
                Ok(msg) => self.handle_change(&msg).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("change stream lagged; {} notification(s) dropped", skipped);
                }
                Err(RecvError::Closed) => {
                    info!("change stream closed; indexer stopping");
                    return;
                }
            }
        }
    }
}

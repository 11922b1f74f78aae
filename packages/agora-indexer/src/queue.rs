//! Deduplicating single-worker process queue.

use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct QueueState {
    pending: VecDeque<String>,
    /// Ids pending or currently in flight; enqueueing one is a no-op.
    tracked: HashSet<String>,
}

/// Deduplicated, sequential work queue over content ids.
///
/// `enqueue_many` may race with an in-progress drain from any number of
/// notification arrivals. `process` coalesces re-entrant calls into the
/// running drain, so exactly one job executes at a time and no id is
/// ever reindexed concurrently with itself.
pub struct ProcessQueue {
    state: Mutex<QueueState>,
    draining: AtomicBool,
}

impl ProcessQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            draining: AtomicBool::new(false),
        }
    }

    /// Queue every id not already pending or in flight, preserving
    /// enqueue order. Returns how many were newly added.
    pub fn enqueue_many<I, S>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.lock();
        let mut added = 0;

        for id in ids {
            let id = id.into();
            if state.tracked.insert(id.clone()) {
                state.pending.push_back(id);
                added += 1;
            }
        }

        added
    }

    /// Ids waiting to be processed.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Drain the queue, running `run` for each id in FIFO order.
    ///
    /// Returns immediately when a drain is already running; the ids
    /// just enqueued will be picked up by it. Each job runs to
    /// completion before the next begins; `run` is expected to contain
    /// its own failures.
    pub async fn process<F, Fut>(&self, run: F)
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = ()>,
    {
        if self.draining.swap(true, Ordering::AcqRel) {
            return;
        }

        loop {
            let next = self.state.lock().pending.pop_front();
            match next {
                Some(id) => {
                    run(id.clone()).await;
                    self.state.lock().tracked.remove(&id);
                }
                None => {
                    self.draining.store(false, Ordering::Release);
                    // An enqueue may have landed between the empty pop
                    // and the flag release; reclaim the drain if nobody
                    // else already has.
                    if self.state.lock().pending.is_empty()
                        || self.draining.swap(true, Ordering::AcqRel)
                    {
                        break;
                    }
                }
            }
        }
    }
}

impl Default for ProcessQueue {
    fn default() -> Self {
        Self::new()
    }
}

//! Minimal diffs against stored listing nodes.

use agora_graph::NodeFragment;
use indexmap::IndexMap;
use serde_json::Value;

/// Entry changes required to bring one stored listing node up to date.
///
/// [`ListingDelta::compute`] returns `None` when the node already
/// reflects the updates; an idempotent rewrite produces no write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDelta {
    /// Entries to insert or rescore, keyed by item id.
    pub updated: IndexMap<String, f64>,
    /// Item ids to drop from the listing.
    pub removed: Vec<String>,
}

impl ListingDelta {
    /// Diff stored entries against `updates` plus explicit `removals`.
    ///
    /// Monotonic per-item upsert: entries for item ids outside `updates`
    /// and `removals` are never touched, and an update equal to the
    /// stored score drops out of the delta.
    pub fn compute(
        existing: Option<&NodeFragment>,
        updates: &[(String, f64)],
        removals: &[String],
    ) -> Option<Self> {
        let mut delta = ListingDelta::default();

        for (id, score) in updates {
            let stored = existing.and_then(|node| node.get(id)).and_then(Value::as_f64);
            if stored != Some(*score) {
                delta.updated.insert(id.clone(), *score);
            }
        }

        for id in removals {
            if existing.map_or(false, |node| node.contains_key(id)) {
                delta.removed.push(id.clone());
            }
        }

        if delta.updated.is_empty() && delta.removed.is_empty() {
            None
        } else {
            Some(delta)
        }
    }

    /// Render as a node fragment: scores as numbers, removals as `null`.
    pub fn to_fragment(&self) -> NodeFragment {
        let mut fragment = NodeFragment::new();
        for (id, score) in &self.updated {
            fragment.insert(id.clone(), serde_json::json!(score));
        }
        for id in &self.removed {
            fragment.insert(id.clone(), Value::Null);
        }
        fragment
    }
}

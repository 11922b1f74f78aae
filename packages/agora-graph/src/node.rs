//! Node fragments, edge references, and change notifications.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::soul::Soul;

/// One node's fields, or a partial update of them.
///
/// Insertion order is preserved so notifications are processed in the
/// order their souls were written.
pub type NodeFragment = IndexMap<String, Value>;

/// A batch of fragments addressed by soul, submitted as one write.
pub type GraphUpdate = IndexMap<Soul, NodeFragment>;

/// Build an edge reference to another node.
pub fn edge_ref(soul: &Soul) -> Value {
    serde_json::json!({ "#": soul.as_str() })
}

/// Extract the target soul of an edge reference, if the value is one.
pub fn edge_target(value: &Value) -> Option<Soul> {
    value.get("#")?.as_str().map(Soul::from)
}

/// A change notification from the graph store.
///
/// `put` maps mutated souls to the fragments written to them. Messages
/// without a `put` field are valid and carry nothing to index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<IndexMap<Soul, NodeFragment>>,
}

impl ChangeMessage {
    pub fn new(put: IndexMap<Soul, NodeFragment>) -> Self {
        Self { put: Some(put) }
    }

    pub fn empty() -> Self {
        Self { put: None }
    }
}

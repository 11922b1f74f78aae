//! Content model: thing data and tabulator vote aggregates.
//!
//! Parsing is total. Content nodes are written by untrusted peers, so
//! malformed or missing fields degrade to defaults instead of failing
//! the job (an unknown `kind` is the one thing that makes a node not a
//! thing at all).

use agora_graph::NodeFragment;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{IndexerError, Result};

/// Pseudo-author attached to unauthenticated commands; never a tagger.
const ANON_AUTHOR: &str = "anon";

/// Closed set of content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThingKind {
    Submission,
    Comment,
    ChatMsg,
}

impl ThingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThingKind::Submission => "submission",
            ThingKind::Comment => "comment",
            ThingKind::ChatMsg => "chatmsg",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "submission" => Ok(ThingKind::Submission),
            "comment" => Ok(ThingKind::Comment),
            "chatmsg" => Ok(ThingKind::ChatMsg),
            _ => Err(IndexerError::parse(format!("unknown thing kind: {}", s))),
        }
    }
}

impl std::fmt::Display for ThingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A content item's classified attributes, as read from its node.
#[derive(Debug, Clone)]
pub struct ThingData {
    pub kind: ThingKind,
    pub author_id: Option<String>,
    /// Normalized (trimmed, lowercased) topic; `None` when empty.
    pub topic: Option<String>,
    /// Submissions only.
    pub domain: Option<String>,
    /// Comments only: root item of the thread.
    pub op_id: Option<String>,
    /// Comments only: direct reply target.
    pub reply_to_id: Option<String>,
    /// Comments only: whether the comment is a command.
    pub is_command: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

impl ThingData {
    /// Classify a stored node. `None` when the node does not carry a
    /// recognizable thing kind.
    pub fn from_node(node: &NodeFragment) -> Option<Self> {
        let kind = ThingKind::from_str(node.get("kind")?.as_str()?).ok()?;

        Some(Self {
            kind,
            author_id: string_field(node, "author"),
            topic: normalize_topic(node.get("topic").and_then(Value::as_str).unwrap_or("")),
            domain: string_field(node, "domain"),
            op_id: string_field(node, "op"),
            reply_to_id: string_field(node, "replyTo"),
            is_command: node.get("command").and_then(Value::as_bool).unwrap_or(false),
            timestamp: node
                .get("timestamp")
                .and_then(Value::as_f64)
                .and_then(|ms| DateTime::from_timestamp_millis(ms as i64)),
        })
    }
}

/// Case-insensitive, whitespace-trimmed topic; empty collapses to `None`.
pub fn normalize_topic(raw: &str) -> Option<String> {
    let topic = raw.trim().to_lowercase();
    if topic.is_empty() {
        None
    } else {
        Some(topic)
    }
}

/// Vote tallies a tabulator maintains for one thing. Absent node or
/// absent fields read as zero.
#[derive(Debug, Clone, Default)]
pub struct VoteCounts {
    pub up: u64,
    pub down: u64,
    pub comments: u64,
    /// Author ids that issued commands against the thing, the anonymous
    /// pseudo-author excluded.
    pub taggers: Vec<String>,
}

impl VoteCounts {
    pub fn from_node(node: Option<&NodeFragment>) -> Self {
        let Some(node) = node else {
            return Self::default();
        };

        let taggers = node
            .get("commands")
            .and_then(Value::as_object)
            .map(|commands| {
                commands
                    .keys()
                    .filter(|issuer| issuer.as_str() != ANON_AUTHOR)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            up: count_field(node, "up"),
            down: count_field(node, "down"),
            comments: count_field(node, "comment"),
            taggers,
        }
    }

    /// Net vote score.
    pub fn score(&self) -> i64 {
        self.up as i64 - self.down as i64
    }
}

/// One item's fetched state: everything sort scoring reads.
#[derive(Debug, Clone)]
pub struct ThingSnapshot {
    pub data: ThingData,
    pub counts: VoteCounts,
}

fn string_field(node: &NodeFragment, key: &str) -> Option<String> {
    node.get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn count_field(node: &NodeFragment, key: &str) -> u64 {
    node.get(key)
        .and_then(Value::as_f64)
        .map(|v| v.max(0.0) as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(pairs: &[(&str, Value)]) -> NodeFragment {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_thing_kind_roundtrip() {
        for kind in [ThingKind::Submission, ThingKind::Comment, ThingKind::ChatMsg] {
            assert_eq!(ThingKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(ThingKind::from_str("poll").is_err());
    }

    #[test]
    fn test_from_node_classifies_submission() {
        let data = ThingData::from_node(&node(&[
            ("kind", json!("submission")),
            ("author", json!("alice")),
            ("topic", json!("  Rust ")),
            ("domain", json!("example.com")),
            ("timestamp", json!(1_700_000_000_000u64)),
        ]))
        .unwrap();

        assert_eq!(data.kind, ThingKind::Submission);
        assert_eq!(data.author_id.as_deref(), Some("alice"));
        assert_eq!(data.topic.as_deref(), Some("rust"));
        assert_eq!(data.domain.as_deref(), Some("example.com"));
        assert!(data.timestamp.is_some());
        assert!(!data.is_command);
    }

    #[test]
    fn test_from_node_without_kind_is_not_a_thing() {
        assert!(ThingData::from_node(&node(&[("author", json!("alice"))])).is_none());
        assert!(ThingData::from_node(&node(&[("kind", json!("poll"))])).is_none());
    }

    #[test]
    fn test_normalize_topic() {
        assert_eq!(normalize_topic(" Foo "), Some("foo".to_string()));
        assert_eq!(normalize_topic("ALL"), Some("all".to_string()));
        assert_eq!(normalize_topic("   "), None);
        assert_eq!(normalize_topic(""), None);
    }

    #[test]
    fn test_vote_counts_defaults() {
        let counts = VoteCounts::from_node(None);
        assert_eq!(counts.up, 0);
        assert_eq!(counts.down, 0);
        assert_eq!(counts.comments, 0);
        assert!(counts.taggers.is_empty());
    }

    #[test]
    fn test_vote_counts_excludes_anon_tagger() {
        let counts = VoteCounts::from_node(Some(&node(&[
            ("up", json!(7)),
            ("down", json!(2)),
            ("comment", json!(3)),
            ("commands", json!({ "anon": { "tag": "x" }, "bob": { "tag": "y" } })),
        ])));

        assert_eq!(counts.up, 7);
        assert_eq!(counts.down, 2);
        assert_eq!(counts.comments, 3);
        assert_eq!(counts.taggers, vec!["bob".to_string()]);
        assert_eq!(counts.score(), 5);
    }

    #[test]
    fn test_malformed_counts_degrade_to_zero() {
        let counts = VoteCounts::from_node(Some(&node(&[
            ("up", json!("many")),
            ("down", json!(-4)),
        ])));
        assert_eq!(counts.up, 0);
        assert_eq!(counts.down, 0);
    }
}

//! Sort score computation.
//!
//! One score per configured sort algorithm, each a pure function of the
//! item's fetched snapshot. Scores for different sorts have no ordering
//! dependency between them.

use serde::{Deserialize, Serialize};

use crate::error::{IndexerError, Result};
use crate::thing::ThingSnapshot;

/// Epoch offset for the hot ranking, seconds.
const HOT_EPOCH_SECS: i64 = 1_500_000_000;
/// Seconds of age that outweigh one order of magnitude of votes.
const HOT_DECAY_SECS: f64 = 45_000.0;

/// Closed set of sort algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    New,
    Top,
    Hot,
    Discussed,
    Controversial,
}

impl SortKind {
    /// Every supported sort, in listing-path order.
    pub fn all() -> &'static [SortKind] {
        &[
            SortKind::New,
            SortKind::Top,
            SortKind::Hot,
            SortKind::Discussed,
            SortKind::Controversial,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKind::New => "new",
            SortKind::Top => "top",
            SortKind::Hot => "hot",
            SortKind::Discussed => "discussed",
            SortKind::Controversial => "controversial",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(SortKind::New),
            "top" => Ok(SortKind::Top),
            "hot" => Ok(SortKind::Hot),
            "discussed" => Ok(SortKind::Discussed),
            "controversial" => Ok(SortKind::Controversial),
            _ => Err(IndexerError::parse(format!("unknown sort: {}", s))),
        }
    }

    /// Score one item under this sort.
    pub fn score(&self, snapshot: &ThingSnapshot) -> f64 {
        match self {
            SortKind::New => timestamp_millis(snapshot) as f64,
            SortKind::Top => snapshot.counts.score() as f64,
            SortKind::Hot => hot_score(snapshot),
            SortKind::Discussed => snapshot.counts.comments as f64,
            SortKind::Controversial => controversy_score(snapshot),
        }
    }
}

impl std::fmt::Display for SortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn timestamp_millis(snapshot: &ThingSnapshot) -> i64 {
    snapshot
        .data
        .timestamp
        .map(|t| t.timestamp_millis())
        .unwrap_or(0)
}

/// Log-magnitude of the net score plus linear age: ten times the votes
/// buys the same rank as 45 000 seconds of recency.
fn hot_score(snapshot: &ThingSnapshot) -> f64 {
    let score = snapshot.counts.score();
    let order = (score.abs().max(1) as f64).log10();
    let sign = match score {
        s if s > 0 => 1.0,
        s if s < 0 => -1.0,
        _ => 0.0,
    };
    let seconds = snapshot
        .data
        .timestamp
        .map(|t| t.timestamp())
        .unwrap_or(HOT_EPOCH_SECS)
        - HOT_EPOCH_SECS;

    sign * order + seconds as f64 / HOT_DECAY_SECS
}

/// Total engagement raised to the vote balance; one-sided items score 0.
fn controversy_score(snapshot: &ThingSnapshot) -> f64 {
    let (up, down) = (snapshot.counts.up, snapshot.counts.down);
    if up == 0 || down == 0 {
        return 0.0;
    }

    let magnitude = (up + down) as f64;
    let balance = if up > down {
        down as f64 / up as f64
    } else {
        up as f64 / down as f64
    };
    magnitude.powf(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thing::{ThingData, ThingKind, VoteCounts};
    use chrono::DateTime;

    fn snapshot(timestamp_ms: i64, up: u64, down: u64, comments: u64) -> ThingSnapshot {
        ThingSnapshot {
            data: ThingData {
                kind: ThingKind::Submission,
                author_id: Some("alice".to_string()),
                topic: Some("rust".to_string()),
                domain: None,
                op_id: None,
                reply_to_id: None,
                is_command: false,
                timestamp: DateTime::from_timestamp_millis(timestamp_ms),
            },
            counts: VoteCounts {
                up,
                down,
                comments,
                taggers: vec![],
            },
        }
    }

    #[test]
    fn test_sort_kind_roundtrip() {
        for sort in SortKind::all() {
            assert_eq!(SortKind::from_str(sort.as_str()).unwrap(), *sort);
        }
        assert!(SortKind::from_str("best").is_err());
    }

    #[test]
    fn test_new_orders_by_timestamp() {
        let earlier = snapshot(1_700_000_000_000, 0, 0, 0);
        let later = snapshot(1_700_000_100_000, 0, 0, 0);
        assert!(SortKind::New.score(&later) > SortKind::New.score(&earlier));
    }

    #[test]
    fn test_top_is_net_score() {
        assert_eq!(SortKind::Top.score(&snapshot(0, 7, 2, 0)), 5.0);
        assert_eq!(SortKind::Top.score(&snapshot(0, 2, 7, 0)), -5.0);
    }

    #[test]
    fn test_hot_prefers_recent_on_equal_votes() {
        let earlier = snapshot(1_700_000_000_000, 10, 0, 0);
        let later = snapshot(1_700_000_100_000, 10, 0, 0);
        assert!(SortKind::Hot.score(&later) > SortKind::Hot.score(&earlier));
    }

    #[test]
    fn test_hot_vote_decade_matches_decay_window() {
        let base = snapshot(1_700_000_000_000, 10, 0, 0);
        let aged_tenfold = snapshot(1_700_000_000_000 + 45_000_000, 1, 0, 0);
        let diff = (SortKind::Hot.score(&base) - SortKind::Hot.score(&aged_tenfold)).abs();
        assert!(diff < 1e-9, "diff was {}", diff);
    }

    #[test]
    fn test_discussed_counts_comments() {
        assert_eq!(SortKind::Discussed.score(&snapshot(0, 0, 0, 12)), 12.0);
        assert_eq!(SortKind::Discussed.score(&snapshot(0, 0, 0, 0)), 0.0);
    }

    #[test]
    fn test_controversial_requires_both_sides() {
        assert_eq!(SortKind::Controversial.score(&snapshot(0, 10, 0, 0)), 0.0);
        assert_eq!(SortKind::Controversial.score(&snapshot(0, 0, 10, 0)), 0.0);

        let balanced = SortKind::Controversial.score(&snapshot(0, 10, 10, 0));
        let lopsided = SortKind::Controversial.score(&snapshot(0, 19, 1, 0));
        assert!(balanced > lopsided);
    }
}

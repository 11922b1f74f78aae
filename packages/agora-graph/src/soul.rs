//! Storage addresses ("souls") and route patterns.
//!
//! Every node in the graph store lives at a deterministic address. This
//! module owns the address scheme:
//!
//! - `things/<thingId>`: a content node
//! - `things/<thingId>/votecounts@<tabulator>`: tabulator-scoped vote
//!   aggregate for a content node
//! - `listings/<tabulator>:<path>`: one sorted listing feed
//! - `things/<thingId>/listings@<tabulator>`: per-thing index of the
//!   listings a tabulator has written it into
//!
//! Derivation is injective as long as tabulator identities contain
//! neither `/` nor `:` and thing ids contain no `/`, both enforced at
//! configuration load, not here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static THING_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^things/([^/@]+)$").expect("thing route pattern"));

static VOTE_COUNTS_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^things/([^/@]+)/votecounts@([^/]+)$").expect("vote counts route pattern")
});

/// A deterministic storage address for one node in the graph store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Soul(String);

impl Soul {
    /// Address of a content node.
    pub fn thing(thing_id: &str) -> Self {
        Self(format!("things/{}", thing_id))
    }

    /// Address of the vote aggregate a tabulator maintains for a thing.
    pub fn vote_counts(thing_id: &str, tabulator: &str) -> Self {
        Self(format!("things/{}/votecounts@{}", thing_id, tabulator))
    }

    /// Address of one listing node for a (tabulator, listing path) pair.
    pub fn listing(tabulator: &str, path: &str) -> Self {
        Self(format!("listings/{}:{}", tabulator, path))
    }

    /// Address of the per-thing index of listings written by a tabulator.
    pub fn listings_meta(thing_id: &str, tabulator: &str) -> Self {
        Self(format!("things/{}/listings@{}", thing_id, tabulator))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Soul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Soul {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Soul {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The two address patterns the change filter recognizes.
///
/// Souls matching neither pattern carry nothing to index and are skipped
/// silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThingRoute {
    /// A content node.
    Thing { thing_id: String },
    /// A tabulator-scoped vote aggregate node.
    VoteCounts { thing_id: String, tabulator: String },
}

impl ThingRoute {
    pub fn match_soul(soul: &Soul) -> Option<Self> {
        if let Some(caps) = THING_ROUTE.captures(soul.as_str()) {
            return Some(ThingRoute::Thing {
                thing_id: caps[1].to_string(),
            });
        }
        if let Some(caps) = VOTE_COUNTS_ROUTE.captures(soul.as_str()) {
            return Some(ThingRoute::VoteCounts {
                thing_id: caps[1].to_string(),
                tabulator: caps[2].to_string(),
            });
        }
        None
    }

    /// The content id the route points at.
    pub fn thing_id(&self) -> &str {
        match self {
            ThingRoute::Thing { thing_id } => thing_id,
            ThingRoute::VoteCounts { thing_id, .. } => thing_id,
        }
    }
}

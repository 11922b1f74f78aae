//! Incremental listing index maintainer.
//!
//! Watches a replicated graph store's change feed and keeps derived,
//! sorted membership indexes ("listings") current for a forum-style
//! application: topic pages, user histories, comment threads, chat
//! feeds. Content is mutated by many untrusted peers; this crate
//! recomputes each touched item's memberships and scores, then merges
//! minimal deltas into the affected listing nodes without stomping
//! concurrent writers.
//!
//! Pipeline: change notification → [`change_filter`] →
//! [`queue::ProcessQueue`] → [`membership`] + [`sorts`] → [`writer`] →
//! graph store.

// Public modules
pub mod change_filter;
pub mod config;
pub mod delta;
pub mod describe;
pub mod error;
pub mod membership;
pub mod queue;
pub mod service;
pub mod sorts;
pub mod thing;
pub mod writer;

// Re-exports
pub use change_filter::ids_to_index;
pub use config::IndexerConfig;
pub use delta::ListingDelta;
pub use describe::{describe_thing, ListingDescription};
pub use error::{IndexerError, Result};
pub use membership::listing_paths;
pub use queue::ProcessQueue;
pub use service::ListingIndexer;
pub use sorts::SortKind;
pub use thing::{ThingData, ThingKind, ThingSnapshot, VoteCounts};
pub use writer::index_thing;

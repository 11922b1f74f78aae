//! Graph store collaborator layer for the agora listing indexer.
//!
//! The indexer treats the replicated graph store as a black box reached
//! through a narrow surface:
//!
//! - [`Soul`]: deterministic storage addresses and route patterns
//! - [`NodeFragment`] / [`ChangeMessage`]: node data and the
//!   change-notification wire shape, validated at the boundary
//! - [`GraphStore`]: the port trait (`get` / `put` / `subscribe`)
//! - [`Scope`]: a per-job cached read context with bounded reads
//!
//! [`MemoryGraphStore`] is the reference implementation of the port for
//! tests and embeddings that bring their own transport.

pub mod error;
pub mod node;
pub mod scope;
pub mod soul;
pub mod store;

pub use error::{GraphError, Result};
pub use node::{edge_ref, edge_target, ChangeMessage, GraphUpdate, NodeFragment};
pub use scope::{Scope, DEFAULT_READ_TIMEOUT};
pub use soul::{Soul, ThingRoute};
pub use store::{GraphStore, MemoryGraphStore};

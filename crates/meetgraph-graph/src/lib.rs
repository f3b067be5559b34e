//! # meetgraph graph
//!
//! Neo4j graph model for Meetup data.
//!
//! Provides the node/relationship registry, idempotent merge operations,
//! a Neo4j-backed and an in-memory store, schema setup and the
//! event synchronization pipeline.

pub mod client;
pub mod cypher;
pub mod error;
pub mod memory;
pub mod model;
pub mod ops;
pub mod schema;
pub mod store;
pub mod sync;

pub use client::GraphClient;
pub use error::{GraphError, GraphResult};
pub use memory::{GraphSnapshot, MemoryGraph};
pub use model::{NodeKind, RelKind};
pub use ops::{EdgeMerge, MergeOp, NodeMerge, Value, WritePolicy};
pub use store::{GraphCounts, GraphStore};
pub use sync::{run_sync, SyncError, SyncOptions, SyncReport, SyncStep};

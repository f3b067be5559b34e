//! The storage engine seam.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::GraphResult;
use crate::ops::MergeOp;

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}

/// A graph database accepting merge operations.
///
/// Implementations guarantee merge-if-absent semantics per call: a node
/// merge with an existing key matches that node, a relationship merge
/// with an existing (type, from, to) matches that relationship, and a
/// relationship merge never creates its endpoints.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn declare_unique_constraint(&self, label: &str, property: &str) -> GraphResult<()>;

    async fn declare_index(&self, label: &str, property: &str) -> GraphResult<()>;

    /// Execute one merge operation atomically.
    async fn execute(&self, op: &MergeOp) -> GraphResult<()>;

    /// Delete every node and relationship.
    async fn drop_all(&self) -> GraphResult<()>;

    async fn counts(&self) -> GraphResult<GraphCounts>;
}

//! Schema initialization (constraints and indexes) and graph wipe.

use tracing::{info, warn};

use crate::error::GraphResult;
use crate::model::{KeyConstraint, NODES};
use crate::store::GraphStore;

/// Declare a constraint or index on every node merge key.
///
/// Safe to run multiple times: statements use IF NOT EXISTS.
pub async fn initialize_schema(store: &dyn GraphStore) -> GraphResult<usize> {
    info!("Initializing Neo4j schema...");

    for spec in NODES {
        match spec.constraint {
            KeyConstraint::Unique => store.declare_unique_constraint(spec.label, spec.key).await?,
            KeyConstraint::Index => store.declare_index(spec.label, spec.key).await?,
        }
    }

    info!("Neo4j schema initialized ({} statements)", NODES.len());
    Ok(NODES.len())
}

/// Delete every node and relationship.
pub async fn drop_graph(store: &dyn GraphStore) -> GraphResult<()> {
    warn!("Dropping every node and relationship from the graph");
    store.drop_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGraph;

    #[tokio::test]
    async fn test_schema_from_registry() {
        let graph = MemoryGraph::new();
        let count = initialize_schema(&graph).await.unwrap();
        assert_eq!(count, 6);
        for (label, key) in [("Event", "id"), ("Group", "id"), ("Member", "id"), ("Topic", "id"), ("Country", "code")] {
            assert!(graph.has_unique_constraint(label, key), "{}.{}", label, key);
        }
        assert!(graph.has_index("City", "name"));
        assert!(!graph.has_unique_constraint("City", "name"));
    }

    #[tokio::test]
    async fn test_schema_is_rerunnable() {
        let graph = MemoryGraph::new();
        initialize_schema(&graph).await.unwrap();
        initialize_schema(&graph).await.unwrap();
        assert!(graph.has_index("City", "name"));
    }
}

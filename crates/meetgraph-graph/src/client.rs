//! Neo4j connection client.

use async_trait::async_trait;
use meetgraph_core::GraphConfig;
use neo4rs::{BoltNull, BoltType, ConfigBuilder, Graph, Query};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cypher::{self, Statement, MERGED_COLUMN};
use crate::error::{GraphError, GraphResult};
use crate::ops::{MergeOp, Value};
use crate::store::{GraphCounts, GraphStore};

impl From<Value> for BoltType {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => BoltType::Null(BoltNull),
            Value::Int(i) => BoltType::from(i),
            Value::Text(s) => BoltType::from(s),
        }
    }
}

fn to_query(statement: Statement) -> Query {
    statement
        .params
        .into_iter()
        .fold(Query::new(statement.cypher), |query, (name, value)| {
            query.param(&name, value)
        })
}

/// Client for Neo4j graph operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect and verify the server answers.
    ///
    /// neo4rs creates its pool lazily, so a `RETURN 1` ping forces the bolt
    /// handshake and surfaces an unreachable server here.
    pub async fn connect(config: &GraphConfig) -> GraphResult<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(20)
            .build()
            .map_err(|e| GraphError::Connection(format!("invalid Neo4j config: {}", e)))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| GraphError::Connection(format!("Neo4j is not responding: {}", e)))?;

        debug!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a Cypher query that returns no results.
    pub async fn run(&self, query: Query) -> GraphResult<()> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> GraphResult<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar<T: DeserializeOwned>(&self, query: Query, field: &str) -> GraphResult<Option<T>> {
        let rows = self.query(query).await?;
        match rows.into_iter().next() {
            Some(row) => {
                let val: T = row
                    .get(field)
                    .map_err(|e| GraphError::Query(format!("Failed to get field '{}': {:?}", field, e)))?;
                Ok(Some(val))
            }
            None => Ok(None),
        }
    }

    /// Get a reference to the underlying neo4rs Graph.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn declare_unique_constraint(&self, label: &str, property: &str) -> GraphResult<()> {
        self.run(Query::new(cypher::unique_constraint(label, property)?))
            .await
    }

    async fn declare_index(&self, label: &str, property: &str) -> GraphResult<()> {
        self.run(Query::new(cypher::index(label, property)?)).await
    }

    async fn execute(&self, op: &MergeOp) -> GraphResult<()> {
        op.validate()?;
        let statement = cypher::render(op);
        debug!(template = %op.template_id(), "Executing merge");

        match op {
            MergeOp::Node(_) => self.run(to_query(statement)).await,
            MergeOp::Edge(edge) => {
                let merged: i64 = self
                    .query_scalar(to_query(statement), MERGED_COLUMN)
                    .await?
                    .unwrap_or(0);
                if merged == 0 {
                    let spec = edge.rel.spec();
                    return Err(GraphError::MissingEndpoint {
                        relationship: spec.rel_type,
                        from: format!("{}:{}", spec.from.label(), edge.from),
                        to: format!("{}:{}", spec.to.label(), edge.to),
                    });
                }
                Ok(())
            }
        }
    }

    async fn drop_all(&self) -> GraphResult<()> {
        self.run(Query::new(cypher::DROP_ALL.to_string())).await
    }

    async fn counts(&self) -> GraphResult<GraphCounts> {
        let node_query = Query::new("MATCH (n) RETURN count(n) as count".to_string());
        let rel_query = Query::new("MATCH ()-[r]->() RETURN count(r) as count".to_string());

        let node_count: i64 = self.query_scalar(node_query, "count").await?.unwrap_or(0);
        let rel_count: i64 = self.query_scalar(rel_query, "count").await?.unwrap_or(0);

        Ok(GraphCounts {
            nodes: node_count as usize,
            relationships: rel_count as usize,
        })
    }
}

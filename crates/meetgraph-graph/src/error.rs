//! Graph storage errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query failed: {0}")]
    Query(String),

    #[error("Cannot merge {label} with a null {key}")]
    NullKey { label: &'static str, key: &'static str },

    #[error("{target} has no property '{property}' in the graph model")]
    UnknownProperty {
        target: &'static str,
        property: &'static str,
    },

    #[error("Cannot merge {relationship}: endpoint missing ({from} -> {to})")]
    MissingEndpoint {
        relationship: &'static str,
        from: String,
        to: String,
    },

    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

impl From<neo4rs::Error> for GraphError {
    fn from(err: neo4rs::Error) -> Self {
        GraphError::Query(err.to_string())
    }
}

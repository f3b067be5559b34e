//! Cypher rendering of merge operations and schema statements.
//!
//! Labels, relationship types and property names come from the graph model
//! registry; only values travel as parameters.

use crate::error::{GraphError, GraphResult};
use crate::ops::{EdgeMerge, MergeOp, NodeMerge, Value, WritePolicy};

/// A Cypher statement with its parameter bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub cypher: String,
    pub params: Vec<(String, Value)>,
}

/// Column returned by relationship merges: number of relationships merged.
pub const MERGED_COLUMN: &str = "merged";

pub fn render(op: &MergeOp) -> Statement {
    match op {
        MergeOp::Node(node) => render_node(node),
        MergeOp::Edge(edge) => render_edge(edge),
    }
}

fn assignments(var: &str, properties: &[(&'static str, Value)]) -> String {
    properties
        .iter()
        .map(|(name, _)| format!("{var}.{name} = ${name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_node(op: &NodeMerge) -> Statement {
    let spec = op.kind.spec();
    let mut cypher = format!("MERGE (n:{} {{{}: $key}})", spec.label, spec.key);

    if !op.properties.is_empty() {
        let clause = match op.policy {
            WritePolicy::CreateOnly => "ON CREATE SET",
            WritePolicy::Overwrite => "SET",
        };
        cypher.push_str(&format!(" {} {}", clause, assignments("n", &op.properties)));
    }

    let mut params = vec![("key".to_string(), op.key.clone())];
    params.extend(op.properties.iter().map(|(name, value)| (name.to_string(), value.clone())));

    Statement { cypher, params }
}

/// Both endpoints are matched, never created: a missing endpoint yields
/// zero rows and `merged = 0`.
fn render_edge(op: &EdgeMerge) -> Statement {
    let spec = op.rel.spec();
    let mut cypher = format!(
        "MATCH (a:{} {{{}: $from_key}}) MATCH (b:{} {{{}: $to_key}}) MERGE (a)-[r:{}]->(b)",
        spec.from.label(),
        spec.from.key(),
        spec.to.label(),
        spec.to.key(),
        spec.rel_type,
    );
    if !op.properties.is_empty() {
        cypher.push_str(&format!(" SET {}", assignments("r", &op.properties)));
    }
    cypher.push_str(&format!(" RETURN count(r) AS {}", MERGED_COLUMN));

    let mut params = vec![
        ("from_key".to_string(), op.from.clone()),
        ("to_key".to_string(), op.to.clone()),
    ];
    params.extend(op.properties.iter().map(|(name, value)| (name.to_string(), value.clone())));

    Statement { cypher, params }
}

/// Accept only plain identifiers for labels and property names.
pub fn identifier(raw: &str) -> GraphResult<&str> {
    let mut chars = raw.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(raw)
    } else {
        Err(GraphError::InvalidIdentifier(raw.to_string()))
    }
}

fn schema_name(label: &str, property: &str) -> String {
    format!("{}_{}", label.to_lowercase(), property.to_lowercase())
}

pub fn unique_constraint(label: &str, property: &str) -> GraphResult<String> {
    let (label, property) = (identifier(label)?, identifier(property)?);
    Ok(format!(
        "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
        schema_name(label, property),
        label,
        property
    ))
}

pub fn index(label: &str, property: &str) -> GraphResult<String> {
    let (label, property) = (identifier(label)?, identifier(property)?);
    Ok(format!(
        "CREATE INDEX {} IF NOT EXISTS FOR (n:{}) ON (n.{})",
        schema_name(label, property),
        label,
        property
    ))
}

pub const DROP_ALL: &str = "MATCH (n) DETACH DELETE n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, RelKind};

    #[test]
    fn test_create_only_node() {
        let op: MergeOp = NodeMerge::new(NodeKind::Event, 42_i64)
            .set("name", "Graph night")
            .set("url", None::<String>)
            .into();
        let stmt = render(&op);
        assert_eq!(
            stmt.cypher,
            "MERGE (n:Event {id: $key}) ON CREATE SET n.name = $name, n.url = $url"
        );
        assert_eq!(stmt.params[0], ("key".to_string(), Value::Int(42)));
        assert_eq!(stmt.params[2], ("url".to_string(), Value::Null));
    }

    #[test]
    fn test_overwrite_node() {
        let op: MergeOp = NodeMerge::new(NodeKind::Member, 7_i64)
            .policy(WritePolicy::Overwrite)
            .set("name", "Ada")
            .into();
        assert_eq!(render(&op).cypher, "MERGE (n:Member {id: $key}) SET n.name = $name");
    }

    #[test]
    fn test_identity_node() {
        let op: MergeOp = NodeMerge::new(NodeKind::City, "Paris").into();
        let stmt = render(&op);
        assert_eq!(stmt.cypher, "MERGE (n:City {name: $key})");
        assert_eq!(stmt.params.len(), 1);
    }

    #[test]
    fn test_edge_matches_endpoints() {
        let op: MergeOp = EdgeMerge::new(RelKind::Declined, 11_i64, 42_i64)
            .set("rsvp_id", 2_i64)
            .into();
        let stmt = render(&op);
        assert_eq!(
            stmt.cypher,
            "MATCH (a:Member {id: $from_key}) MATCH (b:Event {id: $to_key}) \
             MERGE (a)-[r:DECLINED]->(b) SET r.rsvp_id = $rsvp_id RETURN count(r) AS merged"
        );
        assert_eq!(stmt.params.len(), 3);
    }

    #[test]
    fn test_edge_between_identity_nodes() {
        let op: MergeOp = EdgeMerge::new(RelKind::InCountry, "Paris", "FR").into();
        assert_eq!(
            render(&op).cypher,
            "MATCH (a:City {name: $from_key}) MATCH (b:Country {code: $to_key}) \
             MERGE (a)-[r:IN_COUNTRY]->(b) RETURN count(r) AS merged"
        );
    }

    #[test]
    fn test_schema_statements() {
        assert_eq!(
            unique_constraint("Event", "id").unwrap(),
            "CREATE CONSTRAINT event_id IF NOT EXISTS FOR (n:Event) REQUIRE n.id IS UNIQUE"
        );
        assert_eq!(
            index("City", "name").unwrap(),
            "CREATE INDEX city_name IF NOT EXISTS FOR (n:City) ON (n.name)"
        );
    }

    #[test]
    fn test_identifier_rejects_injection() {
        assert!(identifier("Event) DETACH DELETE n //").is_err());
        assert!(identifier("1abc").is_err());
        assert!(identifier("").is_err());
        assert!(identifier("joined_time").is_ok());
    }
}

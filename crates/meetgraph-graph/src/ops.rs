//! Merge operations submitted to a [`crate::GraphStore`].
//!
//! An operation names its template (node or relationship kind plus write
//! policy) and carries the parameter bindings. Stores turn it into their
//! own query form.

use std::fmt;

use serde::Serialize;

use crate::error::{GraphError, GraphResult};
use crate::model::{NodeKind, RelKind};

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// When node attributes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WritePolicy {
    /// Only when the merge creates the node (`ON CREATE SET`).
    CreateOnly,
    /// On every merge (`SET`).
    Overwrite,
}

impl WritePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateOnly => "create_only",
            Self::Overwrite => "overwrite",
        }
    }
}

/// Merge a node by its key, then write attributes per `policy`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMerge {
    pub kind: NodeKind,
    pub key: Value,
    pub properties: Vec<(&'static str, Value)>,
    pub policy: WritePolicy,
}

impl NodeMerge {
    /// Identity-only merge with no attributes.
    pub fn new(kind: NodeKind, key: impl Into<Value>) -> Self {
        Self {
            kind,
            key: key.into(),
            properties: Vec::new(),
            policy: WritePolicy::CreateOnly,
        }
    }

    pub fn policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.properties.push((name, value.into()));
        self
    }
}

/// Merge a relationship between two existing nodes, identified by their
/// merge keys. Properties are written on every merge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMerge {
    pub rel: RelKind,
    pub from: Value,
    pub to: Value,
    pub properties: Vec<(&'static str, Value)>,
}

impl EdgeMerge {
    pub fn new(rel: RelKind, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            rel,
            from: from.into(),
            to: to.into(),
            properties: Vec::new(),
        }
    }

    pub fn set(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.properties.push((name, value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeOp {
    Node(NodeMerge),
    Edge(EdgeMerge),
}

impl From<NodeMerge> for MergeOp {
    fn from(op: NodeMerge) -> Self {
        MergeOp::Node(op)
    }
}

impl From<EdgeMerge> for MergeOp {
    fn from(op: EdgeMerge) -> Self {
        MergeOp::Edge(op)
    }
}

impl MergeOp {
    /// Stable identifier of the query template this operation uses.
    pub fn template_id(&self) -> String {
        match self {
            MergeOp::Node(op) => format!("node:{}:{}", op.kind.label(), op.policy.as_str()),
            MergeOp::Edge(op) => format!("edge:{}", op.rel.rel_type()),
        }
    }

    /// Check the operation against the graph model.
    pub fn validate(&self) -> GraphResult<()> {
        match self {
            MergeOp::Node(op) => {
                if op.key.is_null() {
                    return Err(GraphError::NullKey {
                        label: op.kind.label(),
                        key: op.kind.key(),
                    });
                }
                if let Some((name, _)) = op.properties.iter().find(|(name, _)| !op.kind.has_attribute(name)) {
                    return Err(GraphError::UnknownProperty {
                        target: op.kind.label(),
                        property: *name,
                    });
                }
            }
            MergeOp::Edge(op) => {
                let spec = op.rel.spec();
                if op.from.is_null() {
                    return Err(GraphError::NullKey {
                        label: spec.from.label(),
                        key: spec.from.key(),
                    });
                }
                if op.to.is_null() {
                    return Err(GraphError::NullKey {
                        label: spec.to.label(),
                        key: spec.to.key(),
                    });
                }
                if let Some((name, _)) = op.properties.iter().find(|(name, _)| !op.rel.has_property(name)) {
                    return Err(GraphError::UnknownProperty {
                        target: spec.rel_type,
                        property: *name,
                    });
                }
            }
        }
        Ok(())
    }
}

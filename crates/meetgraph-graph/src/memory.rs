//! In-process graph store with the same merge semantics as Neo4j.
//!
//! Used by tests and dry runs. Setting a property to null removes it,
//! as `SET n.p = null` does.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{GraphError, GraphResult};
use crate::model::{NodeKind, RelKind};
use crate::ops::{EdgeMerge, MergeOp, NodeMerge, Value, WritePolicy};
use crate::store::{GraphCounts, GraphStore};

pub type Properties = BTreeMap<&'static str, Value>;

/// Full contents of a [`MemoryGraph`], comparable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub nodes: BTreeMap<(NodeKind, Value), Properties>,
    pub edges: BTreeMap<(RelKind, Value, Value), Properties>,
}

#[derive(Debug, Default)]
struct State {
    graph: GraphSnapshot,
    constraints: BTreeSet<(String, String)>,
    indexes: BTreeSet<(String, String)>,
    executed: Vec<String>,
    fail_at: Option<usize>,
}

#[derive(Debug, Default)]
pub struct MemoryGraph {
    state: Mutex<State>,
}

fn write_properties(target: &mut Properties, properties: &[(&'static str, Value)]) {
    for (name, value) in properties {
        if value.is_null() {
            target.remove(name);
        } else {
            target.insert(*name, value.clone());
        }
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th `execute` call from now (zero-based) fail.
    pub fn fail_at(&self, n: usize) {
        let mut state = self.lock();
        let done = state.executed.len();
        state.fail_at = Some(done + n);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-call.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.lock().graph.clone()
    }

    /// Template ids of every successful `execute`, in order.
    pub fn executed(&self) -> Vec<String> {
        self.lock().executed.clone()
    }

    pub fn node(&self, kind: NodeKind, key: impl Into<Value>) -> Option<Properties> {
        self.lock().graph.nodes.get(&(kind, key.into())).cloned()
    }

    pub fn node_count(&self, kind: NodeKind) -> usize {
        self.lock().graph.nodes.keys().filter(|(k, _)| *k == kind).count()
    }

    pub fn edge(&self, rel: RelKind, from: impl Into<Value>, to: impl Into<Value>) -> Option<Properties> {
        self.lock()
            .graph
            .edges
            .get(&(rel, from.into(), to.into()))
            .cloned()
    }

    pub fn edge_count(&self, rel: RelKind) -> usize {
        self.lock().graph.edges.keys().filter(|(r, _, _)| *r == rel).count()
    }

    pub fn has_unique_constraint(&self, label: &str, property: &str) -> bool {
        self.lock()
            .constraints
            .contains(&(label.to_string(), property.to_string()))
    }

    pub fn has_index(&self, label: &str, property: &str) -> bool {
        self.lock()
            .indexes
            .contains(&(label.to_string(), property.to_string()))
    }
}

impl State {
    fn merge_node(&mut self, op: &NodeMerge) {
        let key = (op.kind, op.key.clone());
        match self.graph.nodes.get_mut(&key) {
            Some(existing) => {
                if op.policy == WritePolicy::Overwrite {
                    write_properties(existing, &op.properties);
                }
            }
            None => {
                let mut properties = Properties::new();
                write_properties(&mut properties, &op.properties);
                self.graph.nodes.insert(key, properties);
            }
        }
    }

    fn merge_edge(&mut self, op: &EdgeMerge) -> GraphResult<()> {
        let spec = op.rel.spec();
        let from_exists = self.graph.nodes.contains_key(&(spec.from, op.from.clone()));
        let to_exists = self.graph.nodes.contains_key(&(spec.to, op.to.clone()));
        if !from_exists || !to_exists {
            return Err(GraphError::MissingEndpoint {
                relationship: spec.rel_type,
                from: format!("{}:{}", spec.from.label(), op.from),
                to: format!("{}:{}", spec.to.label(), op.to),
            });
        }

        let properties = self
            .graph
            .edges
            .entry((op.rel, op.from.clone(), op.to.clone()))
            .or_default();
        write_properties(properties, &op.properties);
        Ok(())
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn declare_unique_constraint(&self, label: &str, property: &str) -> GraphResult<()> {
        crate::cypher::unique_constraint(label, property)?;
        self.lock()
            .constraints
            .insert((label.to_string(), property.to_string()));
        Ok(())
    }

    async fn declare_index(&self, label: &str, property: &str) -> GraphResult<()> {
        crate::cypher::index(label, property)?;
        self.lock()
            .indexes
            .insert((label.to_string(), property.to_string()));
        Ok(())
    }

    async fn execute(&self, op: &MergeOp) -> GraphResult<()> {
        op.validate()?;
        let mut state = self.lock();

        if state.fail_at == Some(state.executed.len()) {
            state.fail_at = None;
            return Err(GraphError::Query(format!("injected failure on {}", op.template_id())));
        }

        match op {
            MergeOp::Node(node) => state.merge_node(node),
            MergeOp::Edge(edge) => state.merge_edge(edge)?,
        }
        state.executed.push(op.template_id());
        Ok(())
    }

    async fn drop_all(&self) -> GraphResult<()> {
        self.lock().graph = GraphSnapshot::default();
        Ok(())
    }

    async fn counts(&self) -> GraphResult<GraphCounts> {
        let state = self.lock();
        Ok(GraphCounts {
            nodes: state.graph.nodes.len(),
            relationships: state.graph.edges.len(),
        })
    }
}

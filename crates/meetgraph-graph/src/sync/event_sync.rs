//! Event node synchronization.
//!
//! Event attributes are written only when the node is created; later runs
//! leave a stored event untouched.

use meetgraph_core::Event;
use tracing::info;

use crate::error::GraphResult;
use crate::model::NodeKind;
use crate::ops::{MergeOp, NodeMerge, WritePolicy};
use crate::store::GraphStore;

use super::{submit, SyncReport};

pub fn plan_event(event: &Event) -> Vec<MergeOp> {
    vec![NodeMerge::new(NodeKind::Event, event.id)
        .policy(WritePolicy::CreateOnly)
        .set("name", &event.name)
        .set("description", event.description.as_ref())
        .set("url", event.url.as_ref())
        .into()]
}

pub async fn sync_event(store: &dyn GraphStore, event: &Event, report: &mut SyncReport) -> GraphResult<()> {
    submit(store, &plan_event(event), report).await?;
    info!(event_id = event.id, name = %event.name, "Event synced");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Value;

    #[test]
    fn test_event_is_create_only() {
        let event = Event {
            id: 42,
            name: "Graph night".to_string(),
            description: None,
            url: Some("https://www.meetup.com/graphs/events/42/".to_string()),
            group_urlname: "graphs".to_string(),
        };
        let ops = plan_event(&event);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            MergeOp::Node(node) => {
                assert_eq!(node.policy, WritePolicy::CreateOnly);
                assert_eq!(node.key, Value::Int(42));
                assert!(node.properties.contains(&("description", Value::Null)));
            }
            other => panic!("unexpected op {:?}", other),
        }
    }
}

//! RSVP synchronization.
//!
//! Accepted RSVPs become (:Member)-[:PARTICIPATE]->(:Event), declined ones
//! (:Member)-[:DECLINED]->(:Event). Both carry the `rsvp_id`.
//!
//! The member must already have a node, from this run or an earlier import.
//! An RSVP whose member has none is skipped; the store never creates it.

use meetgraph_core::{Rsvp, RsvpSplit};
use tracing::{info, warn};

use crate::error::{GraphError, GraphResult};
use crate::model::RelKind;
use crate::ops::{EdgeMerge, MergeOp};
use crate::store::GraphStore;

use super::SyncReport;

/// Yes/no RSVPs paired with the relationship they become, accepted first.
fn rsvp_edges(split: &RsvpSplit) -> impl Iterator<Item = (RelKind, &Rsvp)> {
    split
        .accepted
        .iter()
        .map(|rsvp| (RelKind::Participate, rsvp))
        .chain(split.declined.iter().map(|rsvp| (RelKind::Declined, rsvp)))
}

pub fn plan_rsvp(event_id: i64, rel: RelKind, rsvp: &Rsvp) -> MergeOp {
    EdgeMerge::new(rel, rsvp.member_id, event_id)
        .set("rsvp_id", rsvp.id)
        .into()
}

pub fn plan_rsvps(event_id: i64, split: &RsvpSplit) -> Vec<MergeOp> {
    rsvp_edges(split)
        .map(|(rel, rsvp)| plan_rsvp(event_id, rel, rsvp))
        .collect()
}

pub async fn sync_rsvps(
    store: &dyn GraphStore,
    event_id: i64,
    split: &RsvpSplit,
    report: &mut SyncReport,
) -> GraphResult<()> {
    for (rel, rsvp) in rsvp_edges(split) {
        match store.execute(&plan_rsvp(event_id, rel, rsvp)).await {
            Ok(()) => {
                report.relationships_merged += 1;
                match rel {
                    RelKind::Participate => report.rsvps_accepted += 1,
                    _ => report.rsvps_declined += 1,
                }
            }
            Err(GraphError::MissingEndpoint { .. }) => {
                warn!(
                    rsvp_id = rsvp.id,
                    member_id = rsvp.member_id,
                    response = rsvp.response.as_str(),
                    "RSVP from a member with no node in the graph, skipping"
                );
                report.rsvps_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    report.rsvps_ignored = split.ignored;

    info!(
        accepted = report.rsvps_accepted,
        declined = report.rsvps_declined,
        skipped = report.rsvps_skipped,
        ignored = report.rsvps_ignored,
        "RSVPs synced"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use meetgraph_core::RsvpResponse;

    use super::*;
    use crate::memory::MemoryGraph;
    use crate::model::NodeKind;
    use crate::ops::{NodeMerge, Value};

    fn rsvp(id: i64, member_id: i64, response: RsvpResponse) -> Rsvp {
        Rsvp {
            id,
            member_id,
            response,
        }
    }

    async fn seeded(members: &[i64]) -> MemoryGraph {
        let graph = MemoryGraph::new();
        graph.execute(&NodeMerge::new(NodeKind::Event, 42_i64).into()).await.unwrap();
        for id in members {
            graph.execute(&NodeMerge::new(NodeKind::Member, *id).into()).await.unwrap();
        }
        graph
    }

    #[test]
    fn test_plan_splits_by_response() {
        let split = RsvpSplit::from_rsvps(vec![
            rsvp(1, 10, RsvpResponse::Yes),
            rsvp(2, 11, RsvpResponse::No),
            rsvp(3, 12, RsvpResponse::Other("waitlist".to_string())),
        ]);
        let ops = plan_rsvps(42, &split);

        assert_eq!(ops.len(), 2);
        match (&ops[0], &ops[1]) {
            (MergeOp::Edge(yes), MergeOp::Edge(no)) => {
                assert_eq!(yes.rel, RelKind::Participate);
                assert_eq!(yes.from, Value::Int(10));
                assert_eq!(yes.to, Value::Int(42));
                assert_eq!(yes.properties, vec![("rsvp_id", Value::Int(1))]);
                assert_eq!(no.rel, RelKind::Declined);
                assert_eq!(no.properties, vec![("rsvp_id", Value::Int(2))]);
            }
            other => panic!("unexpected ops {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_member_without_node_is_skipped() {
        let graph = seeded(&[10]).await;
        let split = RsvpSplit::from_rsvps(vec![rsvp(1, 10, RsvpResponse::Yes), rsvp(2, 99, RsvpResponse::No)]);
        let mut report = SyncReport::new(42);

        sync_rsvps(&graph, 42, &split, &mut report).await.unwrap();

        assert!(graph.edge(RelKind::Participate, 10_i64, 42_i64).is_some());
        assert!(graph.edge(RelKind::Declined, 99_i64, 42_i64).is_none());
        assert!(graph.node(NodeKind::Member, 99_i64).is_none());
        assert_eq!(report.rsvps_accepted, 1);
        assert_eq!(report.rsvps_declined, 0);
        assert_eq!(report.rsvps_skipped, 1);
        assert_eq!(report.relationships_merged, 1);
    }

    #[tokio::test]
    async fn test_member_from_earlier_import_is_linked() {
        let graph = seeded(&[99]).await;
        let split = RsvpSplit::from_rsvps(vec![rsvp(5, 99, RsvpResponse::Yes)]);
        let mut report = SyncReport::new(42);

        sync_rsvps(&graph, 42, &split, &mut report).await.unwrap();

        let edge = graph.edge(RelKind::Participate, 99_i64, 42_i64).unwrap();
        assert_eq!(edge["rsvp_id"], Value::Int(5));
        assert_eq!(report.rsvps_skipped, 0);
    }

    #[tokio::test]
    async fn test_store_failure_aborts() {
        let graph = seeded(&[10, 11]).await;
        graph.fail_at(0);
        let split = RsvpSplit::from_rsvps(vec![rsvp(1, 10, RsvpResponse::Yes), rsvp(2, 11, RsvpResponse::No)]);
        let mut report = SyncReport::new(42);

        let err = sync_rsvps(&graph, 42, &split, &mut report).await.unwrap_err();
        assert!(matches!(err, GraphError::Query(_)));
        assert_eq!(graph.edge_count(RelKind::Declined), 0);
    }
}

//! Group synchronization.
//!
//! Creates nodes and relationships:
//! - (:Group)-[:ORGANISE_EVENT]->(:Event)
//! - (:Group)-[:GROUP_IN_CITY]->(:City)-[:IN_COUNTRY]->(:Country)
//! - (:Topic)-[:TAGS_GROUP]->(:Group)
//! - (:Member)-[:ORGANISE_GROUP]->(:Group)

use meetgraph_core::{Group, Topic};
use tracing::{debug, info};

use crate::error::GraphResult;
use crate::model::{NodeKind, RelKind};
use crate::ops::{EdgeMerge, MergeOp, NodeMerge, WritePolicy};
use crate::store::GraphStore;

use super::{plan_place, submit, SyncReport};

/// Group node written with `policy`, plus its city chain and topics.
pub(crate) fn plan_group_node(group: &Group, policy: WritePolicy) -> Vec<MergeOp> {
    let mut ops: Vec<MergeOp> = vec![NodeMerge::new(NodeKind::Group, group.id)
        .policy(policy)
        .set("name", &group.name)
        .set("description", group.description.as_ref())
        .set("url", group.url.as_ref())
        .into()];

    ops.extend(plan_place(group.city.as_ref(), group.country.as_ref()));
    if let Some(city) = &group.city {
        ops.push(EdgeMerge::new(RelKind::GroupInCity, group.id, &city.name).into());
    }
    ops.extend(plan_topics(group.id, &group.topics));
    ops
}

pub(crate) fn plan_topics(group_id: i64, topics: &[Topic]) -> Vec<MergeOp> {
    topics
        .iter()
        .flat_map(|topic| {
            [
                MergeOp::from(
                    NodeMerge::new(NodeKind::Topic, topic.id)
                        .policy(WritePolicy::CreateOnly)
                        .set("name", &topic.name),
                ),
                MergeOp::from(EdgeMerge::new(RelKind::TagsGroup, topic.id, group_id)),
            ]
        })
        .collect()
}

/// The group organizing the event. Group attributes are create-only here.
pub fn plan_group(event_id: i64, group: &Group) -> Vec<MergeOp> {
    let mut ops = plan_group_node(group, WritePolicy::CreateOnly);
    ops.insert(1, EdgeMerge::new(RelKind::OrganiseEvent, group.id, event_id).into());
    ops
}

/// Organizer member and ORGANISE_GROUP. The member name is written only if
/// the member node is new; the member step owns member attributes.
pub fn plan_organizer(group: &Group) -> Vec<MergeOp> {
    match &group.organizer {
        Some(organizer) => vec![
            NodeMerge::new(NodeKind::Member, organizer.member_id)
                .policy(WritePolicy::CreateOnly)
                .set("name", &organizer.name)
                .into(),
            EdgeMerge::new(RelKind::OrganiseGroup, organizer.member_id, group.id).into(),
        ],
        None => Vec::new(),
    }
}

pub async fn sync_group(
    store: &dyn GraphStore,
    event_id: i64,
    group: &Group,
    report: &mut SyncReport,
) -> GraphResult<()> {
    submit(store, &plan_group(event_id, group), report).await?;
    info!(group_id = group.id, name = %group.name, topics = group.topics.len(), "Group synced");
    Ok(())
}

pub async fn sync_organizer(store: &dyn GraphStore, group: &Group, report: &mut SyncReport) -> GraphResult<()> {
    let ops = plan_organizer(group);
    if ops.is_empty() {
        debug!(group_id = group.id, "Group has no organizer");
        return Ok(());
    }
    submit(store, &ops, report).await?;
    info!(group_id = group.id, "Organizer synced");
    Ok(())
}

//! Member and membership synchronization.
//!
//! Creates nodes and relationships:
//! - (:Member)-[:LIVES_IN]->(:City)-[:IN_COUNTRY]->(:Country)
//! - (:Member)-[:MEMBER_OF]->(:Group)
//!
//! Member attributes are overwritten on every run, as are the attributes of
//! groups reached through a membership.

use meetgraph_core::{Group, Member, MemberGroups};
use meetgraph_meetup::MemberDirectory;
use tracing::{debug, info};

use crate::error::GraphResult;
use crate::model::{NodeKind, RelKind};
use crate::ops::{EdgeMerge, MergeOp, NodeMerge, WritePolicy};
use crate::store::GraphStore;

use super::group_sync::{plan_group_node, plan_organizer};
use super::{plan_place, submit, SyncReport};

pub fn plan_member(member: &Member) -> Vec<MergeOp> {
    let mut ops: Vec<MergeOp> = vec![NodeMerge::new(NodeKind::Member, member.id)
        .policy(WritePolicy::Overwrite)
        .set("name", &member.name)
        .set("avatar", member.avatar.as_ref())
        .set("joined_time", member.joined_time)
        .into()];

    ops.extend(plan_place(member.city.as_ref(), member.country.as_ref()));
    if let Some(city) = &member.city {
        ops.push(EdgeMerge::new(RelKind::LivesIn, member.id, &city.name).into());
    }
    ops
}

/// One joined group: the group itself (overwritten), its organizer, city
/// chain and topics, then MEMBER_OF.
pub fn plan_membership(member_id: i64, group: &Group) -> Vec<MergeOp> {
    let mut ops = plan_group_node(group, WritePolicy::Overwrite);
    ops.extend(plan_organizer(group));
    ops.push(EdgeMerge::new(RelKind::MemberOf, member_id, group.id).into());
    ops
}

pub fn plan_memberships(entry: &MemberGroups) -> Vec<MergeOp> {
    entry
        .groups
        .iter()
        .flat_map(|group| plan_membership(entry.member.id, group))
        .collect()
}

pub async fn sync_members(
    store: &dyn GraphStore,
    directory: &MemberDirectory,
    report: &mut SyncReport,
) -> GraphResult<()> {
    for entry in directory.values() {
        submit(store, &plan_member(&entry.member), report).await?;
        report.members += 1;
        debug!(member_id = entry.member.id, name = %entry.member.name, "Synced member");
    }
    info!(members = directory.len(), "Members synced");
    Ok(())
}

pub async fn sync_memberships(
    store: &dyn GraphStore,
    directory: &MemberDirectory,
    report: &mut SyncReport,
) -> GraphResult<()> {
    for entry in directory.values() {
        submit(store, &plan_memberships(entry), report).await?;
        report.memberships += entry.groups.len();
        debug!(member_id = entry.member.id, groups = entry.groups.len(), "Synced member groups");
    }
    info!(memberships = report.memberships, "Memberships synced");
    Ok(())
}

#[cfg(test)]
mod tests {
    use meetgraph_core::{City, Country, Organizer};

    use super::*;
    use crate::ops::Value;

    fn member(avatar: Option<&str>) -> Member {
        Member {
            id: 10,
            name: "Ada".to_string(),
            avatar: avatar.map(str::to_string),
            joined_time: Some(1_400_000_000_000),
            city: Some(City { name: "London".to_string() }),
            country: Some(Country { code: "GB".to_string() }),
        }
    }

    #[test]
    fn test_member_is_overwritten() {
        let ops = plan_member(&member(Some("a.jpeg")));
        match &ops[0] {
            MergeOp::Node(node) => {
                assert_eq!(node.policy, WritePolicy::Overwrite);
                assert!(node.properties.contains(&("avatar", Value::from("a.jpeg"))));
                assert!(node.properties.contains(&("joined_time", Value::Int(1_400_000_000_000))));
            }
            other => panic!("unexpected op {:?}", other),
        }
        assert!(matches!(ops.last(), Some(MergeOp::Edge(e)) if e.rel == RelKind::LivesIn));
    }

    #[test]
    fn test_missing_avatar_is_null() {
        let ops = plan_member(&member(None));
        match &ops[0] {
            MergeOp::Node(node) => assert!(node.properties.contains(&("avatar", Value::Null))),
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_membership_includes_organizer_and_member_of() {
        let group = Group {
            id: 200,
            name: "Rustaceans".to_string(),
            description: None,
            url: None,
            city: None,
            country: None,
            topics: vec![],
            organizer: Some(Organizer {
                member_id: 7,
                name: "Ferris".to_string(),
            }),
        };
        let templates: Vec<String> = plan_membership(10, &group).iter().map(MergeOp::template_id).collect();
        assert_eq!(
            templates,
            vec![
                "node:Group:overwrite",
                "node:Member:create_only",
                "edge:ORGANISE_GROUP",
                "edge:MEMBER_OF",
            ]
        );
    }
}

//! Fetch driver: pulls raw records and hands back canonical entities.
//!
//! Every fetch error is fatal to the caller. The member walk collects all
//! memberships before returning, so nothing member-related is written
//! until the whole directory is known.

use std::collections::BTreeMap;

use meetgraph_core::records::RawId;
use meetgraph_core::{normalize, Event, Group, MemberGroups, RsvpSplit};
use tracing::{debug, info};

use crate::api::{GroupQuery, MeetupApi};
use crate::error::Result;
use crate::throttle::Throttle;

/// Members of a group keyed by member id, each with the groups they joined.
pub type MemberDirectory = BTreeMap<i64, MemberGroups>;

pub async fn fetch_event(api: &dyn MeetupApi, event_id: i64) -> Result<Event> {
    let mut raw = api.get_event(event_id).await?;
    // The requested id is the merge key, whatever form the API echoes back.
    raw.id = RawId::Int(event_id);
    let event = normalize::event(&raw)?;
    debug!(event_id, name = %event.name, "Fetched event");
    Ok(event)
}

pub async fn fetch_group(api: &dyn MeetupApi, urlname: &str) -> Result<Group> {
    let raw = api.get_group(urlname).await?;
    let group = normalize::group(&raw)?;
    debug!(group_id = group.id, name = %group.name, "Fetched group");
    Ok(group)
}

/// Fetch every member of `group_id`, then for each member the groups they
/// belong to, awaiting `throttle` before each per-member request.
pub async fn fetch_members_with_groups(
    api: &dyn MeetupApi,
    throttle: &mut dyn Throttle,
    group_id: i64,
) -> Result<MemberDirectory> {
    let raw_members = api.get_members(group_id).await?;
    info!(group_id, members = raw_members.len(), "Fetched group members");

    let mut directory = MemberDirectory::new();
    for raw in &raw_members {
        let member = normalize::member(raw)?;
        directory.entry(member.id).or_insert(MemberGroups {
            member,
            groups: Vec::new(),
        });
    }

    let member_ids: Vec<i64> = directory.keys().copied().collect();
    for member_id in member_ids {
        throttle.wait().await;

        let raw_groups = api.get_groups(&GroupQuery::Member(member_id)).await?;
        let groups = raw_groups
            .iter()
            .map(normalize::group)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(member_id, groups = groups.len(), "Fetched member groups");
        if let Some(entry) = directory.get_mut(&member_id) {
            entry.groups.extend(groups);
        }
    }

    Ok(directory)
}

pub async fn fetch_rsvps(api: &dyn MeetupApi, event_id: i64) -> Result<RsvpSplit> {
    let raw = api.get_rsvps(event_id).await?;
    let rsvps = raw
        .iter()
        .map(normalize::rsvp)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let split = RsvpSplit::from_rsvps(rsvps);
    info!(
        event_id,
        accepted = split.accepted.len(),
        declined = split.declined.len(),
        ignored = split.ignored,
        "Fetched RSVPs"
    );
    Ok(split)
}

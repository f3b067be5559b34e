//! Meetup to Neo4j synchronization pipeline.
//!
//! Fetches one event and its surroundings, then submits merge operations in
//! dependency order:
//!
//! 1. Event
//! 2. Organizing group, its city/country, topics
//! 3. The group's organizer
//! 4. Every group member, with their city/country
//! 5. Every member's groups (group, organizer, city/country, topics)
//! 6. RSVPs, split into PARTICIPATE and DECLINED
//!
//! A failed fetch or merge aborts the run. Every operation is a merge, so
//! re-running after a failure completes the graph without duplicates.

pub mod event_sync;
pub mod group_sync;
pub mod member_sync;
pub mod rsvp_sync;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use meetgraph_core::{City, Country};
use meetgraph_meetup::{fetch, MeetupApi, MeetupError, Throttle};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::{GraphError, GraphResult};
use crate::model::{NodeKind, RelKind};
use crate::ops::{EdgeMerge, MergeOp, NodeMerge};
use crate::schema;
use crate::store::GraphStore;

/// Pipeline stage, reported when a run aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncStep {
    Schema,
    Wipe,
    Event,
    Group,
    Organizer,
    Members,
    Memberships,
    Rsvps,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::Schema => "schema setup",
            SyncStep::Wipe => "graph wipe",
            SyncStep::Event => "event",
            SyncStep::Group => "group",
            SyncStep::Organizer => "organizer",
            SyncStep::Members => "members",
            SyncStep::Memberships => "memberships",
            SyncStep::Rsvps => "rsvps",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Fetch failed during {step} step: {source}")]
    Fetch {
        step: SyncStep,
        #[source]
        source: MeetupError,
    },

    #[error("Merge failed during {step} step: {source}")]
    Merge {
        step: SyncStep,
        #[source]
        source: GraphError,
    },
}

impl SyncError {
    fn fetch(step: SyncStep) -> impl FnOnce(MeetupError) -> Self {
        move |source| SyncError::Fetch { step, source }
    }

    fn merge(step: SyncStep) -> impl FnOnce(GraphError) -> Self {
        move |source| SyncError::Merge { step, source }
    }

    pub fn step(&self) -> SyncStep {
        match self {
            SyncError::Fetch { step, .. } | SyncError::Merge { step, .. } => *step,
        }
    }
}

/// Flags controlling a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    pub skip_schema: bool,
    pub drop_db: bool,
}

/// Result of a sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub event_id: i64,
    pub event_name: Option<String>,
    pub group_id: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub nodes_merged: usize,
    pub relationships_merged: usize,
    pub members: usize,
    pub groups: usize,
    pub memberships: usize,
    pub rsvps_accepted: usize,
    pub rsvps_declined: usize,
    pub rsvps_skipped: usize,
    pub rsvps_ignored: usize,
}

impl SyncReport {
    pub fn new(event_id: i64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            event_id,
            event_name: None,
            group_id: None,
            started_at: Utc::now(),
            finished_at: None,
            nodes_merged: 0,
            relationships_merged: 0,
            members: 0,
            groups: 0,
            memberships: 0,
            rsvps_accepted: 0,
            rsvps_declined: 0,
            rsvps_skipped: 0,
            rsvps_ignored: 0,
        }
    }

    pub fn operations(&self) -> usize {
        self.nodes_merged + self.relationships_merged
    }
}

/// Submit operations one by one, in order. Stops at the first failure.
pub async fn submit(store: &dyn GraphStore, ops: &[MergeOp], report: &mut SyncReport) -> GraphResult<()> {
    for op in ops {
        store.execute(op).await?;
        match op {
            MergeOp::Node(_) => report.nodes_merged += 1,
            MergeOp::Edge(_) => report.relationships_merged += 1,
        }
    }
    Ok(())
}

/// City and country nodes plus the IN_COUNTRY link when both are known.
pub(crate) fn plan_place(city: Option<&City>, country: Option<&Country>) -> Vec<MergeOp> {
    let mut ops = Vec::new();
    if let Some(country) = country {
        ops.push(NodeMerge::new(NodeKind::Country, &country.code).into());
    }
    if let Some(city) = city {
        ops.push(NodeMerge::new(NodeKind::City, &city.name).into());
        if let Some(country) = country {
            ops.push(EdgeMerge::new(RelKind::InCountry, &city.name, &country.code).into());
        }
    }
    ops
}

/// Run the full pipeline for one event.
pub async fn run_sync(
    store: &dyn GraphStore,
    api: &dyn MeetupApi,
    throttle: &mut dyn Throttle,
    event_id: i64,
    options: SyncOptions,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::new(event_id);
    let span = info_span!("sync", event_id, run_id = %report.run_id);

    run_steps(store, api, throttle, options, &mut report)
        .instrument(span)
        .await?;

    report.finished_at = Some(Utc::now());
    Ok(report)
}

async fn run_steps(
    store: &dyn GraphStore,
    api: &dyn MeetupApi,
    throttle: &mut dyn Throttle,
    options: SyncOptions,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    let event_id = report.event_id;
    info!("Starting event sync");

    if options.skip_schema {
        info!("Skipping schema creation");
    } else {
        schema::initialize_schema(store)
            .await
            .map_err(SyncError::merge(SyncStep::Schema))?;
    }

    if options.drop_db {
        schema::drop_graph(store)
            .await
            .map_err(SyncError::merge(SyncStep::Wipe))?;
    }

    // 1. Event
    let event = fetch::fetch_event(api, event_id)
        .await
        .map_err(SyncError::fetch(SyncStep::Event))?;
    event_sync::sync_event(store, &event, report)
        .await
        .map_err(SyncError::merge(SyncStep::Event))?;
    report.event_name = Some(event.name.clone());

    // 2. Group
    let group = fetch::fetch_group(api, &event.group_urlname)
        .await
        .map_err(SyncError::fetch(SyncStep::Group))?;
    group_sync::sync_group(store, event.id, &group, report)
        .await
        .map_err(SyncError::merge(SyncStep::Group))?;
    report.group_id = Some(group.id);

    // 3. Organizer
    group_sync::sync_organizer(store, &group, report)
        .await
        .map_err(SyncError::merge(SyncStep::Organizer))?;

    // Every membership is fetched before members are written.
    let directory = fetch::fetch_members_with_groups(api, throttle, group.id)
        .await
        .map_err(SyncError::fetch(SyncStep::Members))?;

    // 4. Members
    member_sync::sync_members(store, &directory, report)
        .await
        .map_err(SyncError::merge(SyncStep::Members))?;

    // 5. Memberships
    member_sync::sync_memberships(store, &directory, report)
        .await
        .map_err(SyncError::merge(SyncStep::Memberships))?;

    let mut group_ids: BTreeSet<i64> = directory
        .values()
        .flat_map(|entry| entry.groups.iter().map(|g| g.id))
        .collect();
    group_ids.insert(group.id);
    report.groups = group_ids.len();

    // 6. RSVPs
    let split = fetch::fetch_rsvps(api, event.id)
        .await
        .map_err(SyncError::fetch(SyncStep::Rsvps))?;
    rsvp_sync::sync_rsvps(store, event.id, &split, report)
        .await
        .map_err(SyncError::merge(SyncStep::Rsvps))?;

    info!(
        nodes = report.nodes_merged,
        rels = report.relationships_merged,
        members = report.members,
        groups = report.groups,
        "Event sync complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_place_full_chain() {
        let city = City { name: "Paris".to_string() };
        let country = Country { code: "FR".to_string() };
        let ops = plan_place(Some(&city), Some(&country));
        let templates: Vec<String> = ops.iter().map(MergeOp::template_id).collect();
        assert_eq!(
            templates,
            vec!["node:Country:create_only", "node:City:create_only", "edge:IN_COUNTRY"]
        );
    }

    #[test]
    fn test_plan_place_without_country() {
        let city = City { name: "Paris".to_string() };
        let ops = plan_place(Some(&city), None);
        assert_eq!(ops.len(), 1);
        assert!(plan_place(None, None).is_empty());
    }

    #[test]
    fn test_error_reports_step() {
        let err = SyncError::merge(SyncStep::Rsvps)(GraphError::Query("boom".to_string()));
        assert_eq!(err.step(), SyncStep::Rsvps);
        assert_eq!(err.to_string(), "Merge failed during rsvps step: Neo4j query failed: boom");
    }
}

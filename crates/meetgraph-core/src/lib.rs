//! # meetgraph core
//!
//! Shared building blocks for the Meetup to Neo4j importer:
//! raw API record shapes, the canonical entities they normalize into,
//! configuration loading and the error types used across the workspace.

pub mod config;
pub mod entity;
pub mod error;
pub mod normalize;
pub mod records;

pub use config::{parse_event_id, Config, GraphConfig, MeetupConfig, SyncConfig};
pub use entity::{
    City, Country, Event, Group, Member, MemberGroups, Organizer, Rsvp, RsvpResponse, RsvpSplit, Topic,
};
pub use error::{ConfigError, ConfigResult, NormalizeError, NormalizeResult};

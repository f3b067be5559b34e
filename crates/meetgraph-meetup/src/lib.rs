//! # meetgraph Meetup source
//!
//! Read-only access to the Meetup v2 REST API and the fetch driver that
//! walks a group's members and their memberships at a bounded request rate.

pub mod api;
pub mod client;
pub mod error;
pub mod fetch;
pub mod throttle;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use api::{GroupQuery, MeetupApi};
pub use client::MeetupClient;
pub use error::{MeetupError, Result};
pub use fetch::{fetch_event, fetch_group, fetch_members_with_groups, fetch_rsvps, MemberDirectory};
pub use throttle::{IntervalGate, Throttle};

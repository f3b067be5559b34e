//! The source API seam.

use async_trait::async_trait;
use meetgraph_core::records::{RawEvent, RawGroup, RawMember, RawRsvp};

use crate::error::{MeetupError, Result};

/// Selector for `GET /2/groups`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupQuery {
    /// The group with this url name.
    Urlname(String),
    /// Every group the member belongs to.
    Member(i64),
}

/// Read-only Meetup API.
///
/// Implemented over HTTP by [`crate::MeetupClient`]; tests provide
/// scripted implementations.
#[async_trait]
pub trait MeetupApi: Send + Sync {
    async fn get_event(&self, event_id: i64) -> Result<RawEvent>;

    async fn get_groups(&self, query: &GroupQuery) -> Result<Vec<RawGroup>>;

    async fn get_members(&self, group_id: i64) -> Result<Vec<RawMember>>;

    async fn get_rsvps(&self, event_id: i64) -> Result<Vec<RawRsvp>>;

    /// First group matching a url name.
    async fn get_group(&self, urlname: &str) -> Result<RawGroup> {
        self.get_groups(&GroupQuery::Urlname(urlname.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MeetupError::NotFound(format!("group '{}'", urlname)))
    }
}

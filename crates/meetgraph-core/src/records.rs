//! Raw record shapes as returned by the Meetup v2 API.
//!
//! These mirror the JSON loosely: every field the API may omit is an
//! `Option`, and identifiers accept either a JSON number or a string.
//! Use [`crate::normalize`] to turn them into canonical entities.

use serde::{Deserialize, Serialize};

/// An identifier that the API sends either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl From<i64> for RawId {
    fn from(id: i64) -> Self {
        RawId::Int(id)
    }
}

impl From<&str> for RawId {
    fn from(id: &str) -> Self {
        RawId::Text(id.to_string())
    }
}

/// `GET /2/event/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: RawId,
    pub name: String,
    pub description: Option<String>,
    pub event_url: Option<String>,
    pub group: RawEventGroup,
}

/// The group reference embedded in an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEventGroup {
    pub id: Option<RawId>,
    pub urlname: String,
}

/// `GET /2/groups`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGroup {
    pub id: RawId,
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub urlname: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    #[serde(default)]
    pub topics: Vec<RawTopic>,
    pub organizer: Option<RawOrganizer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTopic {
    pub id: RawId,
    pub name: String,
    pub urlkey: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrganizer {
    pub member_id: RawId,
    pub name: String,
}

/// `GET /2/members`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMember {
    pub id: RawId,
    pub name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    /// Milliseconds since the epoch.
    pub joined: Option<i64>,
    pub photo: Option<RawPhoto>,
    #[serde(default)]
    pub topics: Vec<RawTopic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPhoto {
    pub thumb_link: Option<String>,
}

/// `GET /2/rsvps`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRsvp {
    pub rsvp_id: RawId,
    pub response: String,
    pub member: RawRsvpMember,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRsvpMember {
    pub member_id: RawId,
    pub name: Option<String>,
}

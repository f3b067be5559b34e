//! Canonical entities produced by the normalizer.
//!
//! Identity fields are already coerced to their merge-key form here,
//! so two equal keys always denote the same graph node.

use serde::{Deserialize, Serialize};

/// A Meetup event. Attributes are written only when the node is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    /// Url name of the organizing group, used to fetch it.
    pub group_urlname: String,
}

/// A city node key: lower-cased, then first letter upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct City {
    pub name: String,
}

/// A country node key: upper-cased ISO code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
}

/// The organizer reference embedded in a group record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub member_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub city: Option<City>,
    pub country: Option<Country>,
    pub topics: Vec<Topic>,
    pub organizer: Option<Organizer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    /// Milliseconds since the epoch.
    pub joined_time: Option<i64>,
    pub city: Option<City>,
    pub country: Option<Country>,
}

/// RSVP answer. Only `yes` and `no` become relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpResponse {
    Yes,
    No,
    Other(String),
}

impl RsvpResponse {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "yes" => Self::Yes,
            "no" => Self::No,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Other(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rsvp {
    pub id: i64,
    pub member_id: i64,
    pub response: RsvpResponse,
}

/// A group member together with every group they belong to.
///
/// Built by the fetch driver before any membership is merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberGroups {
    pub member: Member,
    pub groups: Vec<Group>,
}

/// Event RSVPs grouped by answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpSplit {
    pub accepted: Vec<Rsvp>,
    pub declined: Vec<Rsvp>,
    /// Answers other than yes/no (waitlist and the like).
    pub ignored: usize,
}

impl RsvpSplit {
    /// Split RSVPs by answer, keeping their order within each side.
    pub fn from_rsvps(rsvps: impl IntoIterator<Item = Rsvp>) -> Self {
        let mut split = Self::default();
        for rsvp in rsvps {
            match rsvp.response {
                RsvpResponse::Yes => split.accepted.push(rsvp),
                RsvpResponse::No => split.declined.push(rsvp),
                RsvpResponse::Other(_) => split.ignored += 1,
            }
        }
        split
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsvp(id: i64, member_id: i64, response: &str) -> Rsvp {
        Rsvp {
            id,
            member_id,
            response: RsvpResponse::from_str(response),
        }
    }

    #[test]
    fn test_rsvp_split() {
        let split = RsvpSplit::from_rsvps(vec![
            rsvp(1, 10, "yes"),
            rsvp(2, 11, "no"),
            rsvp(3, 12, "waitlist"),
            rsvp(4, 13, "yes"),
        ]);
        assert_eq!(split.accepted.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(split.declined.len(), 1);
        assert_eq!(split.declined[0].member_id, 11);
        assert_eq!(split.ignored, 1);
    }

    #[test]
    fn test_response_parsing() {
        assert_eq!(RsvpResponse::from_str("No"), RsvpResponse::No);
        assert_eq!(RsvpResponse::from_str("waitlist").as_str(), "waitlist");
    }
}

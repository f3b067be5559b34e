//! Scripted Meetup API and raw record builders for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use meetgraph_core::records::{
    RawEvent, RawEventGroup, RawGroup, RawId, RawMember, RawOrganizer, RawPhoto, RawRsvp,
    RawRsvpMember, RawTopic,
};

use crate::api::{GroupQuery, MeetupApi};
use crate::error::{MeetupError, Result};

/// In-memory [`MeetupApi`] answering from fixed data.
///
/// Every call is recorded so tests can assert on request order.
#[derive(Default)]
pub struct ScriptedApi {
    pub events: HashMap<i64, RawEvent>,
    pub groups_by_urlname: HashMap<String, Vec<RawGroup>>,
    pub groups_by_member: HashMap<i64, Vec<RawGroup>>,
    pub members: HashMap<i64, Vec<RawMember>>,
    pub rsvps: HashMap<i64, Vec<RawRsvp>>,
    /// Member whose group lookup fails with a network error.
    pub failing_member: Option<i64>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl MeetupApi for ScriptedApi {
    async fn get_event(&self, event_id: i64) -> Result<RawEvent> {
        self.record(format!("event:{}", event_id));
        self.events
            .get(&event_id)
            .cloned()
            .ok_or_else(|| MeetupError::NotFound(format!("event {}", event_id)))
    }

    async fn get_groups(&self, query: &GroupQuery) -> Result<Vec<RawGroup>> {
        match query {
            GroupQuery::Urlname(urlname) => {
                self.record(format!("groups:urlname:{}", urlname));
                Ok(self.groups_by_urlname.get(urlname).cloned().unwrap_or_default())
            }
            GroupQuery::Member(member_id) => {
                self.record(format!("groups:member:{}", member_id));
                if self.failing_member == Some(*member_id) {
                    return Err(MeetupError::Network("connection reset".to_string()));
                }
                Ok(self.groups_by_member.get(member_id).cloned().unwrap_or_default())
            }
        }
    }

    async fn get_members(&self, group_id: i64) -> Result<Vec<RawMember>> {
        self.record(format!("members:{}", group_id));
        Ok(self.members.get(&group_id).cloned().unwrap_or_default())
    }

    async fn get_rsvps(&self, event_id: i64) -> Result<Vec<RawRsvp>> {
        self.record(format!("rsvps:{}", event_id));
        Ok(self.rsvps.get(&event_id).cloned().unwrap_or_default())
    }
}

pub fn raw_event(id: i64, name: &str, group_urlname: &str) -> RawEvent {
    RawEvent {
        id: RawId::Int(id),
        name: name.to_string(),
        description: Some(format!("About {}", name)),
        event_url: Some(format!("https://www.meetup.com/{}/events/{}/", group_urlname, id)),
        group: RawEventGroup {
            id: None,
            urlname: group_urlname.to_string(),
        },
    }
}

pub fn raw_topic(id: i64, name: &str) -> RawTopic {
    RawTopic {
        id: RawId::Int(id),
        name: name.to_string(),
        urlkey: None,
    }
}

pub fn raw_group(
    id: i64,
    urlname: &str,
    city: &str,
    country: &str,
    organizer: (i64, &str),
    topics: Vec<RawTopic>,
) -> RawGroup {
    RawGroup {
        id: RawId::Int(id),
        name: format!("Group {}", urlname),
        description: Some(format!("The {} group", urlname)),
        link: Some(format!("https://www.meetup.com/{}/", urlname)),
        urlname: Some(urlname.to_string()),
        country: Some(country.to_string()),
        city: Some(city.to_string()),
        timezone: Some("Europe/Paris".to_string()),
        topics,
        organizer: Some(RawOrganizer {
            member_id: RawId::Int(organizer.0),
            name: organizer.1.to_string(),
        }),
    }
}

pub fn raw_member(id: i64, name: &str, city: &str, country: &str) -> RawMember {
    RawMember {
        id: RawId::Int(id),
        name: name.to_string(),
        country: Some(country.to_string()),
        city: Some(city.to_string()),
        joined: Some(1_400_000_000_000 + id),
        photo: Some(RawPhoto {
            thumb_link: Some(format!("https://photos.meetup.com/thumb_{}.jpeg", id)),
        }),
        topics: Vec::new(),
    }
}

pub fn raw_rsvp(rsvp_id: i64, member_id: i64, response: &str) -> RawRsvp {
    RawRsvp {
        rsvp_id: RawId::Int(rsvp_id),
        response: response.to_string(),
        member: RawRsvpMember {
            member_id: RawId::Int(member_id),
            name: None,
        },
    }
}

//! Record normalizer: raw API records to canonical entities.
//!
//! Pure functions. The same raw record always yields the same entity,
//! which the idempotence of the whole import relies on.

use crate::entity::{City, Country, Event, Group, Member, Organizer, Rsvp, RsvpResponse, Topic};
use crate::error::{NormalizeError, NormalizeResult};
use crate::records::{RawEvent, RawGroup, RawId, RawMember, RawOrganizer, RawRsvp, RawTopic};

/// Coerce a raw identifier to the integer merge key.
pub fn coerce_id(raw: &RawId, record: &'static str, field: &'static str) -> NormalizeResult<i64> {
    match raw {
        RawId::Int(id) => Ok(*id),
        RawId::Text(text) => text.trim().parse::<i64>().map_err(|_| NormalizeError::InvalidId {
            record,
            field,
            value: text.clone(),
        }),
    }
}

/// City key: case-folded, then the first letter upper-cased.
///
/// `"new york"`, `"NEW YORK"` and `"New York"` all become `"New york"`.
pub fn city(raw: Option<&str>) -> Option<City> {
    let trimmed = raw?.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let name: String = first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect();
    Some(City { name })
}

/// Country key: upper-cased code.
pub fn country(raw: Option<&str>) -> Option<Country> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(Country {
        code: trimmed.to_uppercase(),
    })
}

fn non_empty(raw: Option<&String>) -> Option<String> {
    raw.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn event(raw: &RawEvent) -> NormalizeResult<Event> {
    let urlname = raw.group.urlname.trim();
    if urlname.is_empty() {
        return Err(NormalizeError::MissingField {
            record: "event",
            field: "group.urlname",
        });
    }

    Ok(Event {
        id: coerce_id(&raw.id, "event", "id")?,
        name: raw.name.clone(),
        description: non_empty(raw.description.as_ref()),
        url: non_empty(raw.event_url.as_ref()),
        group_urlname: urlname.to_string(),
    })
}

pub fn topic(raw: &RawTopic) -> NormalizeResult<Topic> {
    Ok(Topic {
        id: coerce_id(&raw.id, "topic", "id")?,
        name: raw.name.clone(),
    })
}

pub fn organizer(raw: &RawOrganizer) -> NormalizeResult<Organizer> {
    Ok(Organizer {
        member_id: coerce_id(&raw.member_id, "organizer", "member_id")?,
        name: raw.name.clone(),
    })
}

/// Normalize a group. The url is the public link, or the url name when the
/// record carries no link.
pub fn group(raw: &RawGroup) -> NormalizeResult<Group> {
    let topics = raw.topics.iter().map(topic).collect::<NormalizeResult<Vec<_>>>()?;
    let organizer = raw.organizer.as_ref().map(organizer).transpose()?;

    Ok(Group {
        id: coerce_id(&raw.id, "group", "id")?,
        name: raw.name.clone(),
        description: non_empty(raw.description.as_ref()),
        url: non_empty(raw.link.as_ref()).or_else(|| non_empty(raw.urlname.as_ref())),
        city: city(raw.city.as_deref()),
        country: country(raw.country.as_deref()),
        topics,
        organizer,
    })
}

pub fn member(raw: &RawMember) -> NormalizeResult<Member> {
    let avatar = raw
        .photo
        .as_ref()
        .and_then(|photo| non_empty(photo.thumb_link.as_ref()));

    Ok(Member {
        id: coerce_id(&raw.id, "member", "id")?,
        name: raw.name.clone(),
        avatar,
        joined_time: raw.joined,
        city: city(raw.city.as_deref()),
        country: country(raw.country.as_deref()),
    })
}

pub fn rsvp(raw: &RawRsvp) -> NormalizeResult<Rsvp> {
    Ok(Rsvp {
        id: coerce_id(&raw.rsvp_id, "rsvp", "rsvp_id")?,
        member_id: coerce_id(&raw.member.member_id, "rsvp", "member.member_id")?,
        response: RsvpResponse::from_str(&raw.response),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{RawEventGroup, RawPhoto, RawRsvpMember};

    fn raw_group(city: &str, country: &str) -> RawGroup {
        RawGroup {
            id: RawId::Int(1),
            name: "Graph Lovers".to_string(),
            description: Some("  ".to_string()),
            link: None,
            urlname: Some("graph-lovers".to_string()),
            country: Some(country.to_string()),
            city: Some(city.to_string()),
            timezone: Some("Europe/Paris".to_string()),
            topics: vec![RawTopic {
                id: RawId::Text("563".to_string()),
                name: "Open Source".to_string(),
                urlkey: None,
            }],
            organizer: Some(RawOrganizer {
                member_id: RawId::Int(99),
                name: "Orga".to_string(),
            }),
        }
    }

    #[test]
    fn test_city_case_folding() {
        let a = city(Some("new york")).unwrap();
        let b = city(Some("New York")).unwrap();
        let c = city(Some("NEW YORK")).unwrap();
        assert_eq!(a.name, "New york");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_city_empty_is_none() {
        assert_eq!(city(Some("   ")), None);
        assert_eq!(city(None), None);
    }

    #[test]
    fn test_city_non_ascii() {
        assert_eq!(city(Some("élancourt")).unwrap().name, "Élancourt");
    }

    #[test]
    fn test_country_uppercase() {
        assert_eq!(country(Some("fr")).unwrap().code, "FR");
        assert_eq!(country(Some(" Us ")).unwrap().code, "US");
        assert_eq!(country(Some("")), None);
    }

    #[test]
    fn test_coerce_id() {
        assert_eq!(coerce_id(&RawId::Int(5), "member", "id"), Ok(5));
        assert_eq!(coerce_id(&RawId::from("12"), "member", "id"), Ok(12));
        assert!(matches!(
            coerce_id(&RawId::from("abc"), "member", "id"),
            Err(NormalizeError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_group_normalization() {
        let group = group(&raw_group("paris", "fr")).unwrap();
        assert_eq!(group.city.as_ref().unwrap().name, "Paris");
        assert_eq!(group.country.as_ref().unwrap().code, "FR");
        assert_eq!(group.description, None);
        assert_eq!(group.url.as_deref(), Some("graph-lovers"));
        assert_eq!(group.topics[0].id, 563);
        assert_eq!(group.organizer.as_ref().unwrap().member_id, 99);
    }

    #[test]
    fn test_group_normalization_is_deterministic() {
        let raw = raw_group("lyon", "fr");
        assert_eq!(group(&raw).unwrap(), group(&raw).unwrap());
    }

    #[test]
    fn test_member_without_photo() {
        let raw = RawMember {
            id: RawId::Int(10),
            name: "Bob".to_string(),
            country: None,
            city: None,
            joined: None,
            photo: Some(RawPhoto { thumb_link: None }),
            topics: vec![],
        };
        let member = member(&raw).unwrap();
        assert_eq!(member.avatar, None);
        assert_eq!(member.city, None);
    }

    #[test]
    fn test_event_requires_group_urlname() {
        let raw = RawEvent {
            id: RawId::Int(1),
            name: "Meetup".to_string(),
            description: None,
            event_url: None,
            group: RawEventGroup {
                id: None,
                urlname: " ".to_string(),
            },
        };
        assert_eq!(
            event(&raw),
            Err(NormalizeError::MissingField {
                record: "event",
                field: "group.urlname"
            })
        );
    }

    #[test]
    fn test_rsvp_response() {
        let raw = RawRsvp {
            rsvp_id: RawId::Int(1),
            response: "YES".to_string(),
            member: RawRsvpMember {
                member_id: RawId::Int(10),
                name: None,
            },
        };
        let rsvp = rsvp(&raw).unwrap();
        assert_eq!(rsvp.response, RsvpResponse::Yes);
        assert_eq!(rsvp.member_id, 10);
    }
}

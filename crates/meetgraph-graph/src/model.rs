//! Entity graph model: node and relationship registry.
//!
//! ```cypher
//! (:Group)-[:ORGANISE_EVENT]->(:Event)
//! (:Group)-[:GROUP_IN_CITY]->(:City)-[:IN_COUNTRY]->(:Country)
//! (:Topic)-[:TAGS_GROUP]->(:Group)
//! (:Member)-[:ORGANISE_GROUP]->(:Group)
//! (:Member)-[:MEMBER_OF]->(:Group)
//! (:Member)-[:LIVES_IN]->(:City)
//! (:Member)-[:PARTICIPATE {rsvp_id}]->(:Event)
//! (:Member)-[:DECLINED {rsvp_id}]->(:Event)
//! ```
//!
//! Adding a node or relationship kind is an edit to the tables below;
//! the orchestrator and stores read everything from here.

use serde::Serialize;

/// Node labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NodeKind {
    Event,
    Group,
    Member,
    Topic,
    City,
    Country,
}

/// How the merge key is enforced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyConstraint {
    Unique,
    Index,
}

#[derive(Debug)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub label: &'static str,
    /// Merge key property.
    pub key: &'static str,
    pub attributes: &'static [&'static str],
    pub constraint: KeyConstraint,
}

pub const NODES: &[NodeSpec] = &[
    NodeSpec {
        kind: NodeKind::Event,
        label: "Event",
        key: "id",
        attributes: &["name", "description", "url"],
        constraint: KeyConstraint::Unique,
    },
    NodeSpec {
        kind: NodeKind::Group,
        label: "Group",
        key: "id",
        attributes: &["name", "description", "url"],
        constraint: KeyConstraint::Unique,
    },
    NodeSpec {
        kind: NodeKind::Member,
        label: "Member",
        key: "id",
        attributes: &["name", "avatar", "joined_time"],
        constraint: KeyConstraint::Unique,
    },
    NodeSpec {
        kind: NodeKind::Topic,
        label: "Topic",
        key: "id",
        attributes: &["name"],
        constraint: KeyConstraint::Unique,
    },
    NodeSpec {
        kind: NodeKind::City,
        label: "City",
        key: "name",
        attributes: &[],
        constraint: KeyConstraint::Index,
    },
    NodeSpec {
        kind: NodeKind::Country,
        label: "Country",
        key: "code",
        attributes: &[],
        constraint: KeyConstraint::Unique,
    },
];

impl NodeKind {
    pub fn spec(self) -> &'static NodeSpec {
        NODES
            .iter()
            .find(|spec| spec.kind == self)
            .unwrap_or_else(|| unreachable!("node kind {:?} missing from registry", self))
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn has_attribute(self, name: &str) -> bool {
        self.spec().attributes.contains(&name)
    }
}

/// Relationship types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RelKind {
    OrganiseEvent,
    GroupInCity,
    InCountry,
    TagsGroup,
    OrganiseGroup,
    LivesIn,
    MemberOf,
    Participate,
    Declined,
}

#[derive(Debug)]
pub struct RelSpec {
    pub kind: RelKind,
    pub rel_type: &'static str,
    pub from: NodeKind,
    pub to: NodeKind,
    /// Properties set on every merge.
    pub properties: &'static [&'static str],
}

pub const RELATIONSHIPS: &[RelSpec] = &[
    RelSpec {
        kind: RelKind::OrganiseEvent,
        rel_type: "ORGANISE_EVENT",
        from: NodeKind::Group,
        to: NodeKind::Event,
        properties: &[],
    },
    RelSpec {
        kind: RelKind::GroupInCity,
        rel_type: "GROUP_IN_CITY",
        from: NodeKind::Group,
        to: NodeKind::City,
        properties: &[],
    },
    RelSpec {
        kind: RelKind::InCountry,
        rel_type: "IN_COUNTRY",
        from: NodeKind::City,
        to: NodeKind::Country,
        properties: &[],
    },
    RelSpec {
        kind: RelKind::TagsGroup,
        rel_type: "TAGS_GROUP",
        from: NodeKind::Topic,
        to: NodeKind::Group,
        properties: &[],
    },
    RelSpec {
        kind: RelKind::OrganiseGroup,
        rel_type: "ORGANISE_GROUP",
        from: NodeKind::Member,
        to: NodeKind::Group,
        properties: &[],
    },
    RelSpec {
        kind: RelKind::LivesIn,
        rel_type: "LIVES_IN",
        from: NodeKind::Member,
        to: NodeKind::City,
        properties: &[],
    },
    RelSpec {
        kind: RelKind::MemberOf,
        rel_type: "MEMBER_OF",
        from: NodeKind::Member,
        to: NodeKind::Group,
        properties: &[],
    },
    RelSpec {
        kind: RelKind::Participate,
        rel_type: "PARTICIPATE",
        from: NodeKind::Member,
        to: NodeKind::Event,
        properties: &["rsvp_id"],
    },
    RelSpec {
        kind: RelKind::Declined,
        rel_type: "DECLINED",
        from: NodeKind::Member,
        to: NodeKind::Event,
        properties: &["rsvp_id"],
    },
];

impl RelKind {
    pub fn spec(self) -> &'static RelSpec {
        RELATIONSHIPS
            .iter()
            .find(|spec| spec.kind == self)
            .unwrap_or_else(|| unreachable!("relationship kind {:?} missing from registry", self))
    }

    pub fn rel_type(self) -> &'static str {
        self.spec().rel_type
    }

    pub fn has_property(self, name: &str) -> bool {
        self.spec().properties.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_node_kind_registered_once() {
        let kinds = [
            NodeKind::Event,
            NodeKind::Group,
            NodeKind::Member,
            NodeKind::Topic,
            NodeKind::City,
            NodeKind::Country,
        ];
        for kind in kinds {
            assert_eq!(NODES.iter().filter(|s| s.kind == kind).count(), 1, "{:?}", kind);
        }
        assert_eq!(NODES.len(), kinds.len());
    }

    #[test]
    fn test_labels_and_rel_types_unique() {
        let labels: HashSet<_> = NODES.iter().map(|s| s.label).collect();
        assert_eq!(labels.len(), NODES.len());
        let types: HashSet<_> = RELATIONSHIPS.iter().map(|s| s.rel_type).collect();
        assert_eq!(types.len(), RELATIONSHIPS.len());
    }

    #[test]
    fn test_merge_keys() {
        assert_eq!(NodeKind::City.key(), "name");
        assert_eq!(NodeKind::Country.key(), "code");
        assert_eq!(NodeKind::Member.key(), "id");
        assert!(NodeKind::Member.has_attribute("avatar"));
        assert!(!NodeKind::Event.has_attribute("avatar"));
    }

    #[test]
    fn test_rsvp_relationships_carry_rsvp_id() {
        for kind in [RelKind::Participate, RelKind::Declined] {
            let spec = kind.spec();
            assert_eq!(spec.from, NodeKind::Member);
            assert_eq!(spec.to, NodeKind::Event);
            assert!(kind.has_property("rsvp_id"));
        }
        assert!(!RelKind::MemberOf.has_property("rsvp_id"));
    }
}

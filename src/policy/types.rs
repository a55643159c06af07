//! Core policy types
//!
//! The realm and decision enums plus the membership seam the resolver
//! consults. Membership itself is owned by the host (an admin tool or
//! another policy); this crate only asks yes/no questions about it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Category of protected resource a check applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Realm {
    Milestone,
    Wiki,
    Ticket,
    Attachment,
    Changeset,
    Source,
    Repository,
}

impl Realm {
    /// Get the realm name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Realm::Milestone => "milestone",
            Realm::Wiki => "wiki",
            Realm::Ticket => "ticket",
            Realm::Attachment => "attachment",
            Realm::Changeset => "changeset",
            Realm::Source => "source",
            Realm::Repository => "repository",
        }
    }

    /// Try to parse a realm from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "milestone" => Some(Realm::Milestone),
            "wiki" => Some(Realm::Wiki),
            "ticket" => Some(Realm::Ticket),
            "attachment" => Some(Realm::Attachment),
            "changeset" => Some(Realm::Changeset),
            "source" => Some(Realm::Source),
            "repository" => Some(Realm::Repository),
            _ => None,
        }
    }

    /// Get all realms
    pub fn all() -> &'static [Realm] {
        &[
            Realm::Milestone,
            Realm::Wiki,
            Realm::Ticket,
            Realm::Attachment,
            Realm::Changeset,
            Realm::Source,
            Realm::Repository,
        ]
    }

    /// Whether checks in this realm can produce a decision.
    ///
    /// Attachment, changeset, source and repository are reserved: the rules
    /// file accepts keys for them but every check abstains.
    pub const fn is_actionable(&self) -> bool {
        matches!(self, Realm::Milestone | Realm::Wiki | Realm::Ticket)
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Realm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Realm::try_parse(s).ok_or_else(|| format!("unknown realm '{s}'"))
    }
}

/// Tri-state outcome of a permission check.
///
/// Never collapsed to a boolean: `Abstain` must let later policies in the
/// host's chain decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Access is granted
    Allow,
    /// Access is refused; later policies are not consulted
    Deny,
    /// No opinion; defer to the next policy in the chain
    Abstain,
}

impl Decision {
    pub const fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub const fn is_deny(&self) -> bool {
        matches!(self, Decision::Deny)
    }

    pub const fn is_abstain(&self) -> bool {
        matches!(self, Decision::Abstain)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
            Decision::Abstain => "abstain",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One permission check: who wants what.
///
/// `resource` is the identifying string for the realm: the milestone title,
/// the full wiki page path, or for tickets the title of the milestone the
/// ticket currently belongs to (`None` when unassigned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub identity: String,
    pub realm: Realm,
    pub resource: Option<String>,
}

impl AccessRequest {
    pub fn new(identity: impl Into<String>, realm: Realm, resource: Option<String>) -> Self {
        Self {
            identity: identity.into(),
            realm,
            resource,
        }
    }

    /// Check against a milestone by title
    pub fn milestone(identity: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(identity, Realm::Milestone, Some(title.into()))
    }

    /// Check against a wiki page by full path
    pub fn wiki(identity: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(identity, Realm::Wiki, Some(path.into()))
    }

    /// Check against a ticket via the title of its current milestone
    pub fn ticket(identity: impl Into<String>, milestone: Option<String>) -> Self {
        Self::new(identity, Realm::Ticket, milestone)
    }
}

/// Group membership oracle, supplied by the host.
///
/// Implementations answer whether an identity belongs to a named group.
/// No caching contract is implied; caching is the provider's concern.
pub trait GroupMembership: Send + Sync {
    fn is_member(&self, identity: &str, group: &str) -> bool;
}

impl<F> GroupMembership for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_member(&self, identity: &str, group: &str) -> bool {
        self(identity, group)
    }
}

/// Fixed in-memory membership map, for tests and the CLI's dry-run mode.
#[derive(Debug, Clone, Default)]
pub struct StaticGroups {
    members: BTreeMap<String, BTreeSet<String>>,
}

impl StaticGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity to a group
    pub fn add(&mut self, group: impl Into<String>, identity: impl Into<String>) -> &mut Self {
        self.members
            .entry(group.into())
            .or_default()
            .insert(identity.into());
        self
    }

    /// Build a membership where one identity belongs to the given groups
    pub fn for_identity<I, S>(identity: &str, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut membership = Self::new();
        for group in groups {
            membership.add(group, identity);
        }
        membership
    }
}

impl GroupMembership for StaticGroups {
    fn is_member(&self, identity: &str, group: &str) -> bool {
        self.members
            .get(group)
            .is_some_and(|members| members.contains(identity))
    }
}

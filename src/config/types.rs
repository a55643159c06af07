//! Raw rules-file types
//!
//! These mirror the rules file before pattern compilation: a
//! [`StakeholderConfig`] is an ordered list of [`GroupRule`]s, and the order
//! is load-bearing. It is the first-match priority order used at check time.

use serde::{Deserialize, Serialize};

/// Parsed rules file: one entry per `[section]`, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderConfig {
    pub groups: Vec<GroupRule>,
}

impl StakeholderConfig {
    /// Look up a group by name
    pub fn group(&self, name: &str) -> Option<&GroupRule> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Scopes granted to one stakeholder group.
///
/// An empty pattern list means the realm is not configured for the group:
/// checks in that realm abstain rather than deny.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Group name, matched against membership queries (and against the
    /// identity itself, see the resolver)
    pub name: String,

    /// Glob patterns over milestone titles; also gates tickets via the
    /// milestone they belong to
    #[serde(default)]
    pub milestone: Vec<String>,

    /// Glob patterns over full wiki page paths
    #[serde(default)]
    pub wiki: Vec<String>,
}

impl GroupRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            milestone: Vec::new(),
            wiki: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_lookup() {
        let config = StakeholderConfig {
            groups: vec![GroupRule::new("first"), GroupRule::new("second")],
        };

        assert_eq!(config.group("second").unwrap().name, "second");
        assert!(config.group("third").is_none());
        assert!(!config.is_empty());
    }
}

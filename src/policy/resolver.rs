//! Stakeholder access resolver
//!
//! Resolves one permission check to allow/deny/abstain:
//!
//! 1. The first configured group the identity belongs to is the *active
//!    group*; later groups are never consulted, even if they also match.
//! 2. No active group, or a reserved realm, abstains.
//! 3. Within an actionable realm, the resource string is matched against the
//!    active group's patterns for that realm: any match allows, a configured
//!    scope with no match denies, and an unconfigured scope abstains.
//!
//! Ticket checks go through the ticket's milestone: the resource string is
//! the title of the milestone the ticket belongs to, so a group scoped to
//! specific milestones sees exactly the tickets under them. An unassigned
//! ticket carries an empty title, which no non-trivial pattern matches.

use crate::config::StakeholderConfig;
use crate::error::ConfigError;
use crate::policy::patterns::PatternSet;
use crate::policy::types::{Decision, GroupMembership, Realm};
use tracing::{debug, trace};

/// Immutable, compiled snapshot of the stakeholder rules.
///
/// Built once from a [`StakeholderConfig`]; pattern compilation errors
/// surface here, so `check` itself can never fail. Replaced wholesale on
/// reload (see [`SharedRules`](crate::policy::store::SharedRules)).
#[derive(Debug)]
pub struct StakeholderResolver {
    groups: Vec<GroupScopes>,
}

/// Compiled per-group scopes, one pattern set per configurable realm
#[derive(Debug)]
struct GroupScopes {
    name: String,
    milestone: PatternSet,
    wiki: PatternSet,
}

impl StakeholderResolver {
    /// Compile a resolver from raw configuration
    pub fn new(config: &StakeholderConfig) -> Result<Self, ConfigError> {
        let mut groups = Vec::with_capacity(config.groups.len());

        for rule in &config.groups {
            groups.push(GroupScopes {
                name: rule.name.clone(),
                milestone: PatternSet::new(&rule.name, &rule.milestone)?,
                wiki: PatternSet::new(&rule.name, &rule.wiki)?,
            });
        }

        Ok(Self { groups })
    }

    /// Create a resolver with no groups (abstains on everything)
    pub fn empty() -> Self {
        Self { groups: Vec::new() }
    }

    /// Resolve one permission check.
    ///
    /// Pure over its inputs: the same membership answers and the same
    /// snapshot always produce the same decision, with no side effects.
    pub fn check(
        &self,
        membership: &dyn GroupMembership,
        identity: &str,
        realm: Realm,
        resource: Option<&str>,
    ) -> Decision {
        debug!(identity, %realm, resource, "checking stakeholder access");

        let Some(group) = self.active_group(membership, identity) else {
            trace!(identity, "identity matches no configured group");
            return Decision::Abstain;
        };

        let decision = match realm {
            Realm::Milestone => Self::check_scope(&group.milestone, resource),
            Realm::Wiki => Self::check_scope(&group.wiki, resource),
            // Ticket access follows the ticket's milestone title.
            Realm::Ticket => Self::check_scope(&group.milestone, resource),
            Realm::Attachment | Realm::Changeset | Realm::Source | Realm::Repository => {
                trace!(%realm, "realm is reserved");
                Decision::Abstain
            }
        };

        debug!(identity, group = %group.name, %realm, %decision, "resolved");
        decision
    }

    /// First configured group the identity belongs to.
    ///
    /// A section named exactly like the identity counts as membership, so a
    /// rules file can scope a single user without any group definition.
    fn active_group(&self, membership: &dyn GroupMembership, identity: &str) -> Option<&GroupScopes> {
        self.groups
            .iter()
            .find(|group| group.name == identity || membership.is_member(identity, &group.name))
    }

    fn check_scope(patterns: &PatternSet, resource: Option<&str>) -> Decision {
        if patterns.is_empty() {
            // Realm not configured for this group; other policies decide.
            return Decision::Abstain;
        }

        let key = resource.unwrap_or("");
        match patterns.find_match(key) {
            Some(pattern) => {
                trace!(resource = key, pattern, "resource within granted scope");
                Decision::Allow
            }
            None => {
                trace!(resource = key, "resource outside granted scope");
                Decision::Deny
            }
        }
    }

    /// Configured group names, in priority order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Number of configured groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupRule;
    use crate::policy::types::StaticGroups;

    fn config() -> StakeholderConfig {
        StakeholderConfig {
            groups: vec![
                GroupRule {
                    name: "buckirb_stakeholders".into(),
                    milestone: vec!["Buck-IRB*".into()],
                    wiki: vec!["Projects/Buck-IRB*".into(), "Public*".into()],
                },
                GroupRule {
                    name: "coi_stakeholders".into(),
                    milestone: vec!["COI*".into(), "Trustees COI*".into()],
                    wiki: vec!["Projects/COI*".into(), "Public*".into()],
                },
                GroupRule {
                    name: "wiki_only".into(),
                    milestone: vec![],
                    wiki: vec!["Handbook*".into()],
                },
            ],
        }
    }

    fn resolver() -> StakeholderResolver {
        StakeholderResolver::new(&config()).unwrap()
    }

    fn alice() -> StaticGroups {
        StaticGroups::for_identity("alice", ["buckirb_stakeholders"])
    }

    #[test]
    fn test_unknown_identity_abstains_everywhere() {
        let resolver = resolver();
        let membership = StaticGroups::new();

        for realm in Realm::all() {
            assert_eq!(
                resolver.check(&membership, "mallory", *realm, Some("Buck-IRB 1.9")),
                Decision::Abstain
            );
        }
    }

    #[test]
    fn test_milestone_in_scope_allows() {
        assert_eq!(
            resolver().check(&alice(), "alice", Realm::Milestone, Some("Buck-IRB 1.9")),
            Decision::Allow
        );
    }

    #[test]
    fn test_milestone_out_of_scope_denies() {
        assert_eq!(
            resolver().check(&alice(), "alice", Realm::Milestone, Some("COI 2.0")),
            Decision::Deny
        );
    }

    #[test]
    fn test_wiki_scope() {
        let resolver = resolver();
        assert_eq!(
            resolver.check(&alice(), "alice", Realm::Wiki, Some("Projects/Buck-IRB/Issues")),
            Decision::Allow
        );
        assert_eq!(
            resolver.check(&alice(), "alice", Realm::Wiki, Some("Projects/COI/Notes")),
            Decision::Deny
        );
    }

    #[test]
    fn test_reserved_realm_abstains_even_with_active_group() {
        assert_eq!(
            resolver().check(&alice(), "alice", Realm::Changeset, Some("r123")),
            Decision::Abstain
        );
    }

    #[test]
    fn test_ticket_follows_milestone() {
        let resolver = resolver();
        assert_eq!(
            resolver.check(&alice(), "alice", Realm::Ticket, Some("Buck-IRB 1.9")),
            Decision::Allow
        );
        assert_eq!(
            resolver.check(&alice(), "alice", Realm::Ticket, Some("COI 2.0")),
            Decision::Deny
        );
    }

    #[test]
    fn test_unassigned_ticket_denied_for_milestone_scoped_group() {
        assert_eq!(
            resolver().check(&alice(), "alice", Realm::Ticket, None),
            Decision::Deny
        );
    }

    #[test]
    fn test_unconfigured_realm_abstains() {
        let membership = StaticGroups::for_identity("wanda", ["wiki_only"]);
        let resolver = resolver();

        // No milestone patterns at all: tickets and milestones abstain.
        assert_eq!(
            resolver.check(&membership, "wanda", Realm::Ticket, None),
            Decision::Abstain
        );
        assert_eq!(
            resolver.check(&membership, "wanda", Realm::Milestone, Some("Buck-IRB 1.9")),
            Decision::Abstain
        );
        assert_eq!(
            resolver.check(&membership, "wanda", Realm::Wiki, Some("Handbook/Intro")),
            Decision::Allow
        );
    }

    #[test]
    fn test_first_match_group_wins() {
        // bob is in both groups; only the first-declared one governs, even
        // though the second would have allowed this milestone.
        let membership =
            StaticGroups::for_identity("bob", ["buckirb_stakeholders", "coi_stakeholders"]);

        assert_eq!(
            resolver().check(&membership, "bob", Realm::Milestone, Some("COI 2.0")),
            Decision::Deny
        );
    }

    #[test]
    fn test_identity_named_section_applies_directly() {
        let config = StakeholderConfig {
            groups: vec![GroupRule {
                name: "carol".into(),
                milestone: vec!["Common *".into()],
                wiki: vec![],
            }],
        };
        let resolver = StakeholderResolver::new(&config).unwrap();
        let membership = StaticGroups::new();

        assert_eq!(
            resolver.check(&membership, "carol", Realm::Milestone, Some("Common 1.0")),
            Decision::Allow
        );
        assert_eq!(
            resolver.check(&membership, "dave", Realm::Milestone, Some("Common 1.0")),
            Decision::Abstain
        );
    }

    #[test]
    fn test_empty_resolver_abstains() {
        let resolver = StakeholderResolver::empty();
        assert_eq!(
            resolver.check(&alice(), "alice", Realm::Wiki, Some("Public/Contact")),
            Decision::Abstain
        );
    }

    #[test]
    fn test_invalid_pattern_fails_compilation() {
        let config = StakeholderConfig {
            groups: vec![GroupRule {
                name: "broken".into(),
                milestone: vec!["[oops".into()],
                wiki: vec![],
            }],
        };

        assert!(matches!(
            StakeholderResolver::new(&config).unwrap_err(),
            ConfigError::InvalidPattern { .. }
        ));
    }
}

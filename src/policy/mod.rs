//! Stakeholder access policy
//!
//! Decides whether an identity may see a milestone, wiki page or ticket, by
//! matching the resource's identifying string against the glob scopes of the
//! first configured group the identity belongs to.
//!
//! ## Decision model
//!
//! - The identity belongs to none of the configured groups → **abstain**
//!   (other policies in the host chain decide).
//! - The active group has no patterns for the realm → **abstain**.
//! - The resource matches one of the active group's patterns → **allow**.
//! - The realm is configured for the group but nothing matches → **deny**.
//! - Reserved realms (attachment, changeset, source, repository) →
//!   **abstain**.
//!
//! Group order in the rules file is the priority order: the first group an
//! identity belongs to governs, even if a later group would grant more.
//!
//! ## Example
//!
//! ```
//! use stakeholder_policy::config::load_rules_from_str;
//! use stakeholder_policy::policy::{Decision, Realm, StakeholderResolver, StaticGroups};
//!
//! let config = load_rules_from_str(
//!     "[buckirb_stakeholders]\n\
//!      milestone = Buck-IRB*\n\
//!      wiki = Projects/Buck-IRB*, Public*\n",
//! )
//! .unwrap();
//! let resolver = StakeholderResolver::new(&config).unwrap();
//! let membership = StaticGroups::for_identity("alice", ["buckirb_stakeholders"]);
//!
//! let decision = resolver.check(&membership, "alice", Realm::Wiki, Some("Public/Contact"));
//! assert_eq!(decision, Decision::Allow);
//! ```

pub mod chain;
pub mod patterns;
pub mod resolver;
pub mod store;
pub mod types;

pub use chain::{PermissionPolicy, PolicyChain, StakeholderPolicy};
pub use patterns::PatternSet;
pub use resolver::StakeholderResolver;
pub use store::{RulesSource, SharedRules, WatchedRules};
pub use types::{AccessRequest, Decision, GroupMembership, Realm, StaticGroups};

//! Stakeholder access policy
//!
//! A permission policy that limits what project stakeholders can see in a
//! project-tracking tool. Access to milestones, wiki pages and tickets is
//! scoped by glob patterns assigned to named stakeholder groups in an
//! ini-style rules file; everything else is left to the rest of the host's
//! policy chain.
//!
//! ## Features
//!
//! - **Tri-state decisions** - allow / deny / abstain, so the policy
//!   composes with the host's other permission policies
//! - **First-match groups** - rules-file order is priority order; the first
//!   group an identity belongs to governs the whole check
//! - **Glob scopes** - anchored shell-style globs (`*`, `?`, `[...]`) over
//!   milestone titles and wiki paths; tickets are gated by their milestone
//! - **Hot reload** - the rules file is re-read when it changes on disk,
//!   swapped in atomically, and a broken edit keeps the previous rules
//!
//! ## Example rules file
//!
//! ```ini
//! [buckirb_stakeholders]
//! milestone = Buck-IRB*
//! wiki = Projects/Buck-IRB*, Public*
//!
//! [coi_stakeholders]
//! milestone = COI*, Trustees COI*
//! wiki = Projects/COI*, Projects/Trustees COI*, Public*
//! ```
//!
//! ## Embedding
//!
//! ```no_run
//! use std::sync::Arc;
//! use stakeholder_policy::policy::{
//!     AccessRequest, PermissionPolicy, StakeholderPolicy, StaticGroups,
//! };
//!
//! let mut membership = StaticGroups::new();
//! membership.add("buckirb_stakeholders", "alice");
//!
//! let policy = StakeholderPolicy::watching(
//!     "/etc/tracker/stakeholders.conf",
//!     Arc::new(membership),
//! )?;
//!
//! let decision = policy.check(&AccessRequest::wiki("alice", "Projects/Buck-IRB/Issues"));
//! # Ok::<(), stakeholder_policy::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod policy;

// Re-export main types
pub use config::{GroupRule, StakeholderConfig, load_rules, load_rules_from_str};
pub use error::{ConfigError, ConfigResult};
pub use policy::{
    AccessRequest, Decision, GroupMembership, PermissionPolicy, PolicyChain, Realm,
    StakeholderPolicy, StakeholderResolver, StaticGroups,
};

//! Policy chain integration
//!
//! Hosts evaluate an ordered chain of permission policies: each link answers
//! allow, deny or abstain, the first non-abstain answer wins, and a chain
//! where every link abstains denies. [`StakeholderPolicy`] is the link this
//! crate contributes; [`PolicyChain`] implements the chain contract for
//! hosts that do not already have one, and for tests.

use crate::error::ConfigError;
use crate::policy::resolver::StakeholderResolver;
use crate::policy::store::{RulesSource, SharedRules, WatchedRules};
use crate::policy::types::{AccessRequest, Decision, GroupMembership};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// One link in the host's authorization chain
pub trait PermissionPolicy: Send + Sync {
    fn check(&self, request: &AccessRequest) -> Decision;
}

impl<F> PermissionPolicy for F
where
    F: Fn(&AccessRequest) -> Decision + Send + Sync,
{
    fn check(&self, request: &AccessRequest) -> Decision {
        self(request)
    }
}

/// The stakeholder policy: a rules snapshot source paired with the host's
/// membership provider.
pub struct StakeholderPolicy {
    rules: Arc<dyn RulesSource>,
    membership: Arc<dyn GroupMembership>,
}

impl StakeholderPolicy {
    pub fn new(rules: Arc<dyn RulesSource>, membership: Arc<dyn GroupMembership>) -> Self {
        Self { rules, membership }
    }

    /// Build from an already-compiled rule set (no reload)
    pub fn from_resolver(
        resolver: StakeholderResolver,
        membership: Arc<dyn GroupMembership>,
    ) -> Self {
        Self::new(Arc::new(SharedRules::new(resolver)), membership)
    }

    /// Build from a rules file, reloading it whenever it changes on disk
    pub fn watching(
        path: impl Into<PathBuf>,
        membership: Arc<dyn GroupMembership>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(WatchedRules::open(path)?), membership))
    }
}

impl PermissionPolicy for StakeholderPolicy {
    fn check(&self, request: &AccessRequest) -> Decision {
        self.rules.snapshot().check(
            self.membership.as_ref(),
            &request.identity,
            request.realm,
            request.resource.as_deref(),
        )
    }
}

/// Ordered chain of permission policies, first non-abstain answer wins
#[derive(Default)]
pub struct PolicyChain {
    policies: Vec<Box<dyn PermissionPolicy>>,
}

impl PolicyChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, policy: impl PermissionPolicy + 'static) -> &mut Self {
        self.policies.push(Box::new(policy));
        self
    }

    pub fn with(mut self, policy: impl PermissionPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Evaluate the chain. Every policy abstaining denies.
    pub fn decide(&self, request: &AccessRequest) -> Decision {
        for (index, policy) in self.policies.iter().enumerate() {
            match policy.check(request) {
                Decision::Abstain => continue,
                decision => {
                    debug!(index, %decision, "policy chain settled");
                    return decision;
                }
            }
        }

        debug!("all policies abstained, denying");
        Decision::Deny
    }

    /// Convenience boolean view of [`decide`](Self::decide)
    pub fn permits(&self, request: &AccessRequest) -> bool {
        self.decide(request).is_allow()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

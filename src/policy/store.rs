//! Rule-store snapshots and reload
//!
//! Checks run concurrently inside the host's authorization path, so the only
//! shared mutable state is the handle to the current compiled rule set. A
//! reload builds a complete new [`StakeholderResolver`] and swaps the handle
//! wholesale: an in-flight check holds its own `Arc` snapshot and observes
//! either the old or the new rules in their entirety, never a mix.

use crate::config::load_rules;
use crate::error::ConfigError;
use crate::policy::resolver::StakeholderResolver;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::SystemTime;
use tracing::{info, warn};

/// Anything that can hand out the current rules snapshot
pub trait RulesSource: Send + Sync {
    fn snapshot(&self) -> Arc<StakeholderResolver>;
}

/// Swappable handle to the current compiled rule set
#[derive(Debug)]
pub struct SharedRules {
    current: RwLock<Arc<StakeholderResolver>>,
}

impl SharedRules {
    pub fn new(resolver: StakeholderResolver) -> Self {
        Self {
            current: RwLock::new(Arc::new(resolver)),
        }
    }

    /// The current snapshot; valid for the caller's whole check even if a
    /// reload lands meanwhile
    pub fn snapshot(&self) -> Arc<StakeholderResolver> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the rule set wholesale
    pub fn install(&self, resolver: StakeholderResolver) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Arc::new(resolver);
    }
}

impl RulesSource for SharedRules {
    fn snapshot(&self) -> Arc<StakeholderResolver> {
        SharedRules::snapshot(self)
    }
}

/// File-backed rules that re-load when the file's mtime changes.
///
/// The initial load must succeed. Afterwards a failed reload keeps the
/// last-known-good rules active and is retried only when the file changes
/// again, so a bad edit degrades to a warning instead of an outage.
#[derive(Debug)]
pub struct WatchedRules {
    path: PathBuf,
    rules: SharedRules,
    last_seen: Mutex<Option<SystemTime>>,
}

impl WatchedRules {
    /// Load the rules file and start watching its mtime
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = load_rules(&path)?;
        let resolver = StakeholderResolver::new(&config)?;
        let mtime = Self::mtime_of(&path);

        info!(path = %path.display(), groups = resolver.group_count(), "stakeholder rules loaded");

        Ok(Self {
            path,
            rules: SharedRules::new(resolver),
            last_seen: Mutex::new(mtime),
        })
    }

    /// Current snapshot, refreshing first if the file changed on disk
    pub fn snapshot(&self) -> Arc<StakeholderResolver> {
        self.refresh_if_modified();
        self.rules.snapshot()
    }

    /// Force a reload regardless of mtime
    pub fn reload(&self) -> Result<(), ConfigError> {
        let mut last_seen = self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last_seen = Self::mtime_of(&self.path);

        let config = load_rules(&self.path)?;
        let resolver = StakeholderResolver::new(&config)?;

        info!(path = %self.path.display(), groups = resolver.group_count(), "stakeholder rules reloaded");
        self.rules.install(resolver);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn refresh_if_modified(&self) {
        let Some(mtime) = Self::mtime_of(&self.path) else {
            // File temporarily unreadable; keep serving the current rules.
            return;
        };

        {
            let last_seen = self
                .last_seen
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if *last_seen == Some(mtime) {
                return;
            }
        }

        if let Err(error) = self.reload() {
            warn!(path = %self.path.display(), %error, "rules reload failed, keeping previous rules");
        }
    }

    fn mtime_of(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

impl RulesSource for WatchedRules {
    fn snapshot(&self) -> Arc<StakeholderResolver> {
        WatchedRules::snapshot(self)
    }
}

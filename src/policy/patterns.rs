//! Glob pattern sets for resource scopes
//!
//! Patterns use shell-style glob syntax: `*` matches any run of characters
//! (including `/`, so `Projects/Buck-IRB*` covers subpages), `?` matches a
//! single character, and `[...]` character classes are supported. Matches are
//! anchored to the full resource string and case-sensitive.

use crate::error::ConfigError;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// An ordered set of glob patterns compiled at load time
#[derive(Debug)]
pub struct PatternSet {
    sources: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    /// Compile a list of glob patterns.
    ///
    /// `group` only labels the error when a pattern fails to compile.
    pub fn new(group: &str, patterns: &[String]) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                group: group.to_string(),
                pattern: pattern.clone(),
                reason: e.kind().to_string(),
            })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|e| ConfigError::InvalidPattern {
            group: group.to_string(),
            pattern: e.glob().map(|g| g.to_string()).unwrap_or_default(),
            reason: e.kind().to_string(),
        })?;

        Ok(Self {
            sources: patterns.to_vec(),
            set,
        })
    }

    /// Create an empty pattern set (matches nothing)
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Check if a resource string matches any pattern
    pub fn matches(&self, resource: &str) -> bool {
        self.set.is_match(resource)
    }

    /// Check if a resource string matches, returning the matching pattern
    pub fn find_match(&self, resource: &str) -> Option<&str> {
        self.set
            .matches(resource)
            .first()
            .map(|&i| self.sources[i].as_str())
    }

    /// Check if this set has any patterns
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Get the number of patterns
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// The configured pattern strings, in priority order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::empty()
    }
}

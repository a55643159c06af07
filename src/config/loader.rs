//! Rules-file loader
//!
//! The rules file is ini-style. Each section is a stakeholder group; section
//! order is the first-match priority order, so it is preserved verbatim.
//! Recognized keys hold comma-separated glob pattern lists:
//!
//! ```ini
//! [buckirb_stakeholders]
//! milestone = Buck-IRB*
//! wiki = Projects/Buck-IRB*, Public*
//! ```
//!
//! `attachment`, `changeset`, `source` and `repository` keys are accepted but
//! inert (reserved realms). Any other key is ignored, so a newer rules file
//! still loads on an older build. All glob patterns are validated here;
//! a file that fails to load never replaces an installed rule set.

use crate::config::types::{GroupRule, StakeholderConfig};
use crate::error::ConfigError;
use globset::Glob;
use ini::Ini;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Keys reserved for realms that always abstain
const RESERVED_KEYS: &[&str] = &["attachment", "changeset", "source", "repository"];

/// Load and validate a rules file from disk
pub fn load_rules(path: impl AsRef<Path>) -> Result<StakeholderConfig, ConfigError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading stakeholder rules");

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    load_rules_from_str(&content)
}

/// Load and validate rules from an ini string (useful for testing)
pub fn load_rules_from_str(content: &str) -> Result<StakeholderConfig, ConfigError> {
    let ini = Ini::load_from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let mut groups = Vec::new();
    let mut seen = HashSet::new();

    for (section, properties) in ini.iter() {
        let Some(name) = section else {
            // Keys outside any section belong to no group.
            debug!("ignoring sectionless keys in rules file");
            continue;
        };

        if !seen.insert(name.to_string()) {
            return Err(ConfigError::Invalid {
                message: format!("duplicate group section '{name}'"),
            });
        }

        let mut rule = GroupRule::new(name);

        for (key, value) in properties.iter() {
            match key {
                "milestone" => rule.milestone = split_patterns(value),
                "wiki" => rule.wiki = split_patterns(value),
                _ if RESERVED_KEYS.contains(&key) => {
                    debug!(group = name, key, "realm is reserved, key is inert");
                }
                _ => {
                    debug!(group = name, key, "ignoring unrecognized key");
                }
            }
        }

        groups.push(rule);
    }

    let config = StakeholderConfig { groups };
    validate(&config)?;

    Ok(config)
}

/// Split a comma-separated pattern list, trimming whitespace and dropping
/// empty entries
fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate that every pattern is a syntactically valid glob
fn validate(config: &StakeholderConfig) -> Result<(), ConfigError> {
    for group in &config.groups {
        for pattern in group.milestone.iter().chain(group.wiki.iter()) {
            Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                group: group.name.clone(),
                pattern: pattern.clone(),
                reason: e.kind().to_string(),
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_basic() {
        let config = load_rules_from_str(
            r"
[buckirb_stakeholders]
milestone = Buck-IRB*
wiki = Projects/Buck-IRB*, Public*
",
        )
        .unwrap();

        assert_eq!(config.groups.len(), 1);
        let group = &config.groups[0];
        assert_eq!(group.name, "buckirb_stakeholders");
        assert_eq!(group.milestone, vec!["Buck-IRB*"]);
        assert_eq!(group.wiki, vec!["Projects/Buck-IRB*", "Public*"]);
    }

    #[test]
    fn test_section_order_preserved() {
        let config = load_rules_from_str(
            r"
[zeta]
wiki = Z*

[alpha]
wiki = A*

[mid]
wiki = M*
",
        )
        .unwrap();

        let names: Vec<&str> = config.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_pattern_list_trimming() {
        let config = load_rules_from_str(
            r"
[grp]
milestone =   COI* ,  Trustees COI* , ,
",
        )
        .unwrap();

        assert_eq!(config.groups[0].milestone, vec!["COI*", "Trustees COI*"]);
    }

    #[test]
    fn test_missing_keys_mean_unconfigured() {
        let config = load_rules_from_str(
            r"
[wiki_only]
wiki = Handbook*
",
        )
        .unwrap();

        let group = &config.groups[0];
        assert!(group.milestone.is_empty());
        assert_eq!(group.wiki, vec!["Handbook*"]);
    }

    #[test]
    fn test_reserved_and_unknown_keys_ignored() {
        let config = load_rules_from_str(
            r"
[grp]
milestone = Buck-IRB*
changeset = r1*
repository = main
report = 7
",
        )
        .unwrap();

        let group = &config.groups[0];
        assert_eq!(group.milestone, vec!["Buck-IRB*"]);
        assert!(group.wiki.is_empty());
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let result = load_rules_from_str(
            r"
[grp]
wiki = Projects/[bad
",
        );

        match result.unwrap_err() {
            ConfigError::InvalidPattern { group, pattern, .. } => {
                assert_eq!(group, "grp");
                assert_eq!(pattern, "Projects/[bad");
            }
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_file() {
        let result = load_rules("/nonexistent/stakeholder.conf");
        assert!(matches!(result.unwrap_err(), ConfigError::Read { .. }));
    }

    #[test]
    fn test_empty_file_loads_empty_config() {
        let config = load_rules_from_str("").unwrap();
        assert!(config.is_empty());
    }
}

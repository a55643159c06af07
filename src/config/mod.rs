//! Rules-file configuration
//!
//! Handles loading and validating the ini-style stakeholder rules file.

pub mod loader;
pub mod types;

pub use loader::{load_rules, load_rules_from_str};
pub use types::{GroupRule, StakeholderConfig};

//! Error types for stakeholder-policy
//!
//! The only fallible surface is configuration loading: an unreadable rules
//! file or an invalid glob pattern fails at load/reload time. Permission
//! checks themselves never fail; "no opinion" cases are expressed through
//! [`Decision::Abstain`](crate::policy::Decision::Abstain), not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Rules-file loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read rules file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file: {0}")]
    Parse(String),

    #[error("invalid glob pattern '{pattern}' in group '{group}': {reason}")]
    InvalidPattern {
        group: String,
        pattern: String,
        reason: String,
    },

    #[error("invalid rules file: {message}")]
    Invalid { message: String },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

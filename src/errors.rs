// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::exec::Lifecycle;
use crate::report::Report;

#[derive(Error, Debug)]
pub enum HeraldError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON encoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("invalid log file pattern {pattern:?}: {reason}")]
    LogPattern { pattern: String, reason: String },

    /// The command never started. The synthetic report has already been
    /// delivered to every handler by the time this is returned.
    #[error("failed to execute the command: {source}")]
    Launch {
        report: Box<Report>,
        #[source]
        source: std::io::Error,
    },

    #[error("supervisor already ran (state: {0:?})")]
    AlreadyRan(Lifecycle),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HeraldError {
    /// The report attached to a launch failure, if any.
    pub fn report(&self) -> Option<&Report> {
        match self {
            HeraldError::Launch { report, .. } => Some(report),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, HeraldError>;

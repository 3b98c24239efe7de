//! Error types for the GHL CLI
//!
//! Messages are user-facing and say what to check.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Credentials file missing, unreadable or malformed
    #[error("Configuration error: {0}. Check the credentials file passed with --conf.")]
    Config(String),

    /// Profile absent from the credentials file
    #[error("Profile '{profile}' not found in '{path}'. Add a [{profile}] table or pass --profile.")]
    ProfileNotFound { profile: String, path: String },

    /// Profile lacks a required key
    #[error("Profile '{profile}' has no '{key}' entry")]
    MissingKey { profile: String, key: String },

    /// Pipeline failure
    #[error(transparent)]
    Ingest(#[from] ghl_ingest::IngestError),

    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse credentials file: {0}. Check the file syntax.")]
    ConfigParse(#[from] ini::ParseError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn missing_key(profile: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKey {
            profile: profile.into(),
            key: key.into(),
        }
    }
}

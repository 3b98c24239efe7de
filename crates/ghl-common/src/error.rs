//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, GhlError>;

/// Error type for shared domain types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GhlError {
    #[error("Unknown gene category: {0}")]
    UnknownGeneCategory(String),

    #[error("Unknown node role: {0}")]
    UnknownNodeRole(String),
}

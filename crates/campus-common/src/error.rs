//! Error types shared across the campus workspace

use thiserror::Error;

/// Result type alias for campus operations
pub type Result<T> = std::result::Result<T, CampusError>;

/// Main error type for cross-crate failures
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

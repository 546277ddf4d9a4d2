//! Error types

use thiserror::Error;

/// Startup error type for Review Metrics
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

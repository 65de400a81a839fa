//! Error types for the Greenlight server

use greenlight_core::CoreError;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine error surfaced during startup or request handling
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Input/output error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

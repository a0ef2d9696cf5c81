//! Error types for the report server.

use std::path::PathBuf;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// IO error.
    #[error("IO error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Report engine error.
    #[error("Core error: {0}")]
    Core(#[from] salesdash_core::Error),

    /// Host and port do not form a socket address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: e.to_string(),
        }
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

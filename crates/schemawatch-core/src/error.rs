//! Error types for the schemawatch system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for schemawatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the schemawatch system
#[derive(Error, Debug)]
pub enum Error {
    /// Transport errors (network failure or an unexpected HTTP status)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Diff tool errors (the tool could not be invoked at all)
    #[error("Diff tool error: {0}")]
    DiffTool(String),

    /// Metadata store errors
    #[error("Metadata store error: {0}")]
    MetaStore(String),

    /// Snapshot archive errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Run log errors
    #[error("Run log error: {0}")]
    RunLog(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem-level errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a diff tool error
    pub fn diff_tool(msg: impl Into<String>) -> Self {
        Self::DiffTool(msg.into())
    }

    /// Create a metadata store error
    pub fn meta_store(msg: impl Into<String>) -> Self {
        Self::MetaStore(msg.into())
    }

    /// Create a snapshot archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Create a run log error
    pub fn run_log(msg: impl Into<String>) -> Self {
        Self::RunLog(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

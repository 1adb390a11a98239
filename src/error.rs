//! Error types
//!
//! Storage errors never leave the history/settings layer; they are logged
//! and the in-memory state stays authoritative.

use thiserror::Error;

/// Failure talking to the durable key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage backend (private browsing, no window, disabled by policy)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Backend refused the write (quota exceeded, read-only, ...)
    #[error("storage write rejected for key `{key}`: {reason}")]
    WriteRejected { key: String, reason: String },
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
    /// Stored text is not a valid encoding of the expected value
    #[error("corrupt value under `{key}`: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
}

/// Invalid wheel configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("wheel needs at least one option")]
    NoOptions,
    #[error("invalid rotation range [{min}, {max})")]
    InvalidRotationRange { min: f64, max: f64 },
}

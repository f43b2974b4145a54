//! Error types for keystash
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Absence is never an error: a missing key, a malformed path, or a path
//! segment that does not resolve all surface as `Ok(None)`.

use std::io;
use thiserror::Error;

/// Result type alias for keystash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for keystash
#[derive(Debug, Error)]
pub enum Error {
    /// The value cannot be stored (callables have no string form)
    #[error("Unsupported value: cannot store a {type_name}")]
    UnsupportedValue {
        /// Type name of the rejected value
        type_name: &'static str,
    },

    /// The backing store refused a write because it would exceed its quota
    #[error("Quota exceeded writing '{key}': {required} bytes required, limit is {limit}")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Total bytes the store would hold after the write
        required: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Persisted store data is unreadable
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// I/O error (file-backed stores)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

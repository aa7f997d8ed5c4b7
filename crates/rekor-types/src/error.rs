//! Error types for rekor-types

use thiserror::Error;

/// Errors that can occur while decoding Rekor data
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid base64 or hex encoding, or wrong digest length
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Invalid signed tree head (checkpoint note) format
    #[error("Invalid checkpoint format: {0}")]
    InvalidCheckpoint(String),

    /// Invalid hash algorithm
    #[error("Invalid hash algorithm: {0}")]
    InvalidHashAlgorithm(String),

    /// Entry kind or version this crate does not model
    #[error("Unsupported entry kind: {kind}/{version}")]
    UnsupportedEntryKind { kind: String, version: String },

    /// The API response did not contain exactly one entry
    #[error("Invalid log entry response: {0}")]
    InvalidResponse(String),
}

/// Result type for rekor-types operations
pub type Result<T> = std::result::Result<T, Error>;

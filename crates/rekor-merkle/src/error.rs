//! Error types for rekor-merkle

use std::fmt;
use thiserror::Error;

/// Which root a reconstruction was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    /// Root claimed by an inclusion proof
    Inclusion,
    /// Root of the smaller tree of a consistency proof
    Old,
    /// Root of the larger tree of a consistency proof
    New,
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Root::Inclusion => write!(f, "inclusion"),
            Root::Old => write!(f, "old"),
            Root::New => write!(f, "new"),
        }
    }
}

/// Errors that can occur in Merkle tree operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Leaf index or tree size out of range
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// Proof shape does not match the tree sizes
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// Recomputed root differs from the claimed one
    #[error("{root} root mismatch: expected {expected}, computed {actual}")]
    RootMismatch {
        root: Root,
        expected: String,
        actual: String,
    },
}

/// Result type for Merkle tree operations
pub type Result<T> = std::result::Result<T, Error>;

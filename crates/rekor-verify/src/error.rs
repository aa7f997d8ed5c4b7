//! Error types for rekor-verify
//!
//! Every failure the verifier can report is one of these kinds. The lower
//! crates' errors convert into them, and each kind carries a distinct
//! process exit status for command line front ends.

use thiserror::Error;

/// Errors that can occur during verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Log index out of range, negative, or tree size zero
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// Proof hash count inconsistent with the sizes, or undecodable proof hash
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// Recomputed root disagrees with the claimed root
    #[error("root mismatch: {0}")]
    RootMismatch(String),

    /// Signature does not verify under the extracted key
    #[error("invalid signature: {0}")]
    SignatureInvalid(String),

    /// Key, signature or digest scheme not implemented
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The log source failed to supply data
    #[error("input unavailable: {0}")]
    InputUnavailable(String),

    /// The artifact does not hash to the digest recorded in the entry
    #[error("artifact digest mismatch: entry records {expected}, artifact hashes to {actual}")]
    ArtifactDigestMismatch { expected: String, actual: String },

    /// Entry body, certificate or key cannot be decoded
    #[error("malformed entry: {0}")]
    MalformedEntry(String),

    /// Tree IDs differ, or a signed tree head disagrees with its checkpoint
    #[error("checkpoint mismatch: {0}")]
    CheckpointMismatch(String),
}

impl Error {
    /// Process exit status for this kind of failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidIndex(_) => 10,
            Error::MalformedProof(_) => 11,
            Error::RootMismatch(_) => 12,
            Error::SignatureInvalid(_) => 13,
            Error::UnsupportedAlgorithm(_) => 14,
            Error::InputUnavailable(_) => 15,
            Error::ArtifactDigestMismatch { .. } => 16,
            Error::MalformedEntry(_) => 17,
            Error::CheckpointMismatch(_) => 18,
        }
    }
}

impl From<rekor_merkle::Error> for Error {
    fn from(e: rekor_merkle::Error) -> Self {
        match e {
            rekor_merkle::Error::InvalidIndex(msg) => Error::InvalidIndex(msg),
            rekor_merkle::Error::MalformedProof(msg) => Error::MalformedProof(msg),
            e @ rekor_merkle::Error::RootMismatch { .. } => Error::RootMismatch(e.to_string()),
        }
    }
}

impl From<rekor_crypto::Error> for Error {
    fn from(e: rekor_crypto::Error) -> Self {
        match e {
            rekor_crypto::Error::SignatureInvalid(msg) => Error::SignatureInvalid(msg),
            rekor_crypto::Error::UnsupportedAlgorithm(msg) => Error::UnsupportedAlgorithm(msg),
            other => Error::MalformedEntry(other.to_string()),
        }
    }
}

impl From<rekor_types::Error> for Error {
    fn from(e: rekor_types::Error) -> Self {
        match e {
            rekor_types::Error::InvalidHashAlgorithm(name) => {
                Error::UnsupportedAlgorithm(format!("artifact digest algorithm {}", name))
            }
            other => Error::MalformedEntry(other.to_string()),
        }
    }
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;

//! Core types for Rekor transparency log verification
//!
//! This crate provides the data structures exchanged with a Rekor log:
//! log entries and their inclusion proofs, checkpoints (log info and signed
//! tree heads), consistency proofs and typed entry bodies.

pub mod body;
pub mod checkpoint;
pub mod encoding;
pub mod entry;
pub mod error;
pub mod hash;
pub mod proof;

pub use body::{EntryBody, SignedArtifactSpec};
pub use checkpoint::{Checkpoint, NoteSignature, SignedTreeHead, TreeState};
pub use encoding::{Base64, Hex, Sha256Hash};
pub use entry::{InclusionProof, LogEntry, LogEntryResponse, Verification};
pub use error::{Error, Result};
pub use hash::HashAlgorithm;
pub use proof::ConsistencyProof;

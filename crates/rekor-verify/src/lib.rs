//! Rekor log entry and checkpoint verification
//!
//! This crate ties the Merkle proof verifiers and the signature verifier
//! together:
//!
//! - [`Verifier::verify_entry`] recomputes an entry's leaf hash, checks its
//!   inclusion proof and checks the artifact signature it records.
//! - [`Verifier::verify_consistency`] checks that a previously seen tree is a
//!   prefix of the latest one.
//! - [`LogSource`] is the seam through which already-fetched log data reaches
//!   the verifier.
//!
//! # Example
//!
//! ```no_run
//! use rekor_merkle::Rfc6962Hasher;
//! use rekor_types::LogEntry;
//! use rekor_verify::{Verifier, VerifyConfig};
//!
//! # fn example(response: &str, artifact: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let entry = LogEntry::from_response_json(response)?;
//! let verifier = Verifier::new(Rfc6962Hasher, VerifyConfig::default());
//! let report = verifier.verify_entry(&entry, artifact)?;
//! report.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod leaf;
pub mod source;
pub mod verify;

pub use config::VerifyConfig;
pub use error::{Error, Result};
pub use leaf::compute_leaf_hash;
pub use source::LogSource;
pub use verify::{EntryReport, Stage, Verdict, Verifier};

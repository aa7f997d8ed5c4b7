//! Cryptographic primitives for Rekor entry verification
//!
//! This crate extracts public keys from the certificates and keys embedded in
//! log entries and verifies artifact signatures with them, using aws-lc-rs as
//! the cryptographic backend.
//!
//! Key generation and certificate issuance live in `signing`, which is only
//! built for this crate's tests or with the `test-util` feature, so that other
//! crates' tests can produce signed entries.

pub mod error;
pub mod hash;
pub mod key;
#[cfg(any(test, feature = "test-util"))]
pub mod signing;
pub mod verification;
pub mod x509;

pub use error::{Error, Result};
pub use hash::{digest, sha256, sha384, sha512};
pub use key::PublicKey;
#[cfg(any(test, feature = "test-util"))]
pub use signing::{KeyPair, Signature};
pub use verification::{verify_artifact_signature, verify_signature, SigningScheme};
pub use x509::{parse_certificate_info, CertificateInfo};

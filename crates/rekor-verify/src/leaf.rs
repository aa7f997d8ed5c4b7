//! Leaf hashing of log entries

use crate::error::{Error, Result};
use rekor_merkle::LogHasher;
use rekor_types::Base64;

/// Compute the Merkle leaf hash of an entry body
///
/// The leaf is the base64-decoded `body` field byte for byte: the
/// canonicalized JSON the log hashed when the entry was written. The JSON is
/// never parsed and re-serialized here.
pub fn compute_leaf_hash<H: LogHasher>(hasher: &H, body: &Base64) -> Result<H::Hash> {
    let canonical = body
        .decode()
        .map_err(|e| Error::MalformedEntry(format!("entry body: {}", e)))?;
    Ok(hasher.hash_leaf(&canonical))
}

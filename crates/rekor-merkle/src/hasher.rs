//! Merkle tree hashing
//!
//! RFC 6962 separates leaf and interior node hashes with a one-byte prefix
//! (0x00 for leaves, 0x01 for nodes) so that a leaf can never be passed off
//! as an interior node or vice versa.

use rekor_types::Sha256Hash;
use sha2::{Digest, Sha256};
use std::fmt;

/// Prefix for leaf nodes in RFC 6962 Merkle tree
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// Prefix for internal nodes in RFC 6962 Merkle tree
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Hash size in bytes (SHA-256)
pub const HASH_SIZE: usize = 32;

/// Hash primitive of a transparency log tree
///
/// Implementations must apply distinct domain-separation prefixes to leaves
/// and interior nodes. Every verifier takes the hasher as an explicit
/// argument; there is no process-wide default.
pub trait LogHasher: Send + Sync {
    /// Fixed-width digest produced by this hasher
    type Hash: Copy + Eq + fmt::Debug + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Hash a leaf: `H(0x00 || data)`
    fn hash_leaf(&self, data: &[u8]) -> Self::Hash;

    /// Hash two children into their parent: `H(0x01 || left || right)`
    fn hash_children(&self, left: &Self::Hash, right: &Self::Hash) -> Self::Hash;

    /// Digest width in bytes
    fn size(&self) -> usize;
}

/// RFC 6962 SHA-256 tree hasher, as used by Rekor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rfc6962Hasher;

impl LogHasher for Rfc6962Hasher {
    type Hash = Sha256Hash;

    fn hash_leaf(&self, data: &[u8]) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update([LEAF_HASH_PREFIX]);
        hasher.update(data);
        Sha256Hash::from_bytes(hasher.finalize().into())
    }

    fn hash_children(&self, left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update([NODE_HASH_PREFIX]);
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Sha256Hash::from_bytes(hasher.finalize().into())
    }

    fn size(&self) -> usize {
        HASH_SIZE
    }
}

/// Number of bits needed to represent `n`
pub(crate) fn bit_length(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}

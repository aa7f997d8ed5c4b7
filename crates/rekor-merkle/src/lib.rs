//! RFC 6962 Merkle tree verification for Rekor
//!
//! This crate implements the Merkle tree operations a log monitor needs:
//! domain-separated leaf and node hashing, inclusion proof verification and
//! consistency proof verification. The hash primitive is supplied by the
//! caller through the [`LogHasher`] trait; [`Rfc6962Hasher`] is the SHA-256
//! instantiation used by Rekor.

pub mod error;
pub mod hasher;
pub mod proof;

pub use error::{Error, Result, Root};
pub use hasher::{LogHasher, Rfc6962Hasher, HASH_SIZE, LEAF_HASH_PREFIX, NODE_HASH_PREFIX};
pub use proof::{
    consistency_proof_size, inclusion_proof_size, root_from_inclusion_proof, verify_consistency,
    verify_inclusion,
};

//! Hashing utilities using aws-lc-rs

use aws_lc_rs::digest::{self, SHA256, SHA384, SHA512};
use rekor_types::HashAlgorithm;

/// Hash data using SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = digest::digest(&SHA256, data);
    let mut result = [0u8; 32];
    result.copy_from_slice(digest.as_ref());
    result
}

/// Hash data using SHA-384
pub fn sha384(data: &[u8]) -> [u8; 48] {
    let digest = digest::digest(&SHA384, data);
    let mut result = [0u8; 48];
    result.copy_from_slice(digest.as_ref());
    result
}

/// Hash data using SHA-512
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let digest = digest::digest(&SHA512, data);
    let mut result = [0u8; 64];
    result.copy_from_slice(digest.as_ref());
    result
}

/// Digest `data` with the algorithm an entry body names
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Sha2256 => sha256(data).to_vec(),
        HashAlgorithm::Sha2384 => sha384(data).to_vec(),
        HashAlgorithm::Sha2512 => sha512(data).to_vec(),
    }
}

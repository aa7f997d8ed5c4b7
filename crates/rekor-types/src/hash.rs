//! Artifact digest algorithm names as they appear in Rekor entry bodies

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Digest algorithms an entry body may record for its artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA2-256
    #[serde(rename = "sha256")]
    Sha2256,
    /// SHA2-384
    #[serde(rename = "sha384")]
    Sha2384,
    /// SHA2-512
    #[serde(rename = "sha512")]
    Sha2512,
}

impl HashAlgorithm {
    /// Get the digest size in bytes for this algorithm
    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha2256 => 32,
            HashAlgorithm::Sha2384 => 48,
            HashAlgorithm::Sha2512 => 64,
        }
    }

    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha2256 => "sha256",
            HashAlgorithm::Sha2384 => "sha384",
            HashAlgorithm::Sha2512 => "sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha2_256" => Ok(HashAlgorithm::Sha2256),
            "sha384" | "sha2_384" => Ok(HashAlgorithm::Sha2384),
            "sha512" | "sha2_512" => Ok(HashAlgorithm::Sha2512),
            other => Err(Error::InvalidHashAlgorithm(other.to_string())),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Strongly-typed Rekor entry bodies
//!
//! The body of a log entry is canonicalized JSON of the form
//! `{"apiVersion": ..., "kind": ..., "spec": {...}}`. Only the kinds that
//! carry a detached signature over an artifact are modelled here.

use crate::encoding::{Base64, Hex};
use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;
use serde::{Deserialize, Serialize};

/// Parsed Rekor entry body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    /// hashedrekord v0.0.1
    HashedRekordV001(SignedArtifactSpec),
    /// rekord v0.0.1
    RekordV001(SignedArtifactSpec),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBody {
    api_version: String,
    kind: String,
    spec: serde_json::Value,
}

/// Spec shared by `hashedrekord` and `rekord` v0.0.1 bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedArtifactSpec {
    /// Recorded digest of the signed artifact
    pub data: ArtifactData,
    /// Signature and the key or certificate that made it
    pub signature: ArtifactSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactData {
    #[serde(default)]
    pub hash: Option<ArtifactHash>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHash {
    /// Algorithm name as recorded, e.g. `sha256`
    pub algorithm: String,
    pub value: Hex,
}

impl ArtifactHash {
    /// Parse the recorded algorithm name
    pub fn hash_algorithm(&self) -> Result<HashAlgorithm> {
        self.algorithm.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSignature {
    /// Signature bytes (base64)
    pub content: Base64,
    /// `x509` for rekord entries, absent for hashedrekord
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub public_key: PublicKeyContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyContent {
    /// Base64 of a PEM certificate or PEM public key
    pub content: Base64,
}

impl EntryBody {
    /// Parse a body from its canonicalized JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: RawBody = serde_json::from_slice(bytes)?;

        match (raw.kind.as_str(), raw.api_version.as_str()) {
            ("hashedrekord", "0.0.1") => Ok(EntryBody::HashedRekordV001(serde_json::from_value(
                raw.spec,
            )?)),
            ("rekord", "0.0.1") => Ok(EntryBody::RekordV001(serde_json::from_value(raw.spec)?)),
            _ => Err(Error::UnsupportedEntryKind {
                kind: raw.kind,
                version: raw.api_version,
            }),
        }
    }

    /// Parse a body from the base64 form stored in a log entry
    pub fn from_base64(body: &Base64) -> Result<Self> {
        Self::from_bytes(&body.decode()?)
    }

    /// Signature, key and recorded digest of the entry
    pub fn spec(&self) -> &SignedArtifactSpec {
        match self {
            EntryBody::HashedRekordV001(spec) | EntryBody::RekordV001(spec) => spec,
        }
    }

    /// Decoded signature bytes
    pub fn signature(&self) -> Result<Vec<u8>> {
        self.spec().signature.content.decode()
    }

    /// Decoded PEM document holding the verification key
    pub fn public_key_pem(&self) -> Result<String> {
        let bytes = self.spec().signature.public_key.content.decode()?;
        String::from_utf8(bytes)
            .map_err(|e| Error::InvalidEncoding(format!("public key is not UTF-8 PEM: {}", e)))
    }

    /// Recorded artifact digest, if the body carries one
    pub fn artifact_hash(&self) -> Option<&ArtifactHash> {
        self.spec().data.hash.as_ref()
    }
}

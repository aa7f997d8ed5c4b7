//! Rekor log entry types
//!
//! These mirror the JSON returned by `GET /api/v1/log/entries?logIndex=N`:
//! a map with a single key (the entry UUID) whose value is the entry.

use crate::encoding::{Base64, Hex};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A log entry from Rekor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// UUID of the entry (the key in the response map)
    #[serde(skip)]
    pub uuid: String,
    /// Base64 of the canonicalized entry body
    pub body: Base64,
    /// Integrated time (Unix timestamp)
    #[serde(default)]
    pub integrated_time: i64,
    /// Log ID (hex-encoded SHA-256 of the log's public key)
    #[serde(rename = "logID", default)]
    pub log_id: String,
    /// Global log index
    pub log_index: i64,
    /// Verification data
    #[serde(default)]
    pub verification: Option<Verification>,
}

/// Verification data for a log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// Inclusion proof
    #[serde(default)]
    pub inclusion_proof: Option<InclusionProof>,
    /// Signed entry timestamp (SET)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_entry_timestamp: Option<Base64>,
}

/// Inclusion proof as returned by the Rekor v1 API.
///
/// `log_index` is the position inside the active shard's tree, which differs
/// from the entry's global `logIndex` once the log has been sharded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    /// Signed tree head at proof time
    #[serde(default)]
    pub checkpoint: String,
    /// Audit path, leaf to root (hex)
    pub hashes: Vec<Hex>,
    /// Index of the leaf in the shard tree
    pub log_index: i64,
    /// Claimed root hash (hex)
    pub root_hash: Hex,
    /// Tree size at proof time
    pub tree_size: i64,
}

/// Response map from an entries query, keyed by UUID
pub type LogEntryResponse = BTreeMap<String, LogEntry>;

impl LogEntry {
    /// Parse a single entry out of an entries response body
    pub fn from_response_json(json: &str) -> Result<Self> {
        let entries: LogEntryResponse = serde_json::from_str(json)?;
        Self::from_response(entries)
    }

    /// Take the only entry out of a decoded entries response
    pub fn from_response(entries: LogEntryResponse) -> Result<Self> {
        if entries.len() != 1 {
            return Err(Error::InvalidResponse(format!(
                "expected exactly one entry, got {}",
                entries.len()
            )));
        }

        let (uuid, mut entry) = entries
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("empty response".to_string()))?;
        entry.uuid = uuid;
        Ok(entry)
    }

    /// The inclusion proof attached to this entry, if the server sent one
    pub fn inclusion_proof(&self) -> Option<&InclusionProof> {
        self.verification
            .as_ref()
            .and_then(|v| v.inclusion_proof.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "24296fb24b8ad77a1ad7edcd612f1e4a2c12b8c9b6d4e0d0a7a3bd0e1f3a7e5b": {
            "body": "eyJhcGlWZXJzaW9uIjoiMC4wLjEifQ==",
            "integratedTime": 1700000000,
            "logID": "c0d23d6ad406973f9559f3ba2d1ca01f84147d8ffc5b8445c224f98b9591801d",
            "logIndex": 508008011,
            "verification": {
                "inclusionProof": {
                    "checkpoint": "rekor.sigstore.dev - 1193050959916656506\n3\nAAAA\n",
                    "hashes": ["00", "11"],
                    "logIndex": 2,
                    "rootHash": "aa",
                    "treeSize": 3
                },
                "signedEntryTimestamp": "MEUCIQ=="
            }
        }
    }"#;

    #[test]
    fn test_parse_entry_response() {
        let entry = LogEntry::from_response_json(RESPONSE).unwrap();
        assert_eq!(
            entry.uuid,
            "24296fb24b8ad77a1ad7edcd612f1e4a2c12b8c9b6d4e0d0a7a3bd0e1f3a7e5b"
        );
        assert_eq!(entry.log_index, 508008011);

        let proof = entry.inclusion_proof().unwrap();
        assert_eq!(proof.log_index, 2);
        assert_eq!(proof.tree_size, 3);
        assert_eq!(proof.hashes.len(), 2);
        assert_eq!(proof.root_hash.as_str(), "aa");
    }

    #[test]
    fn test_empty_response_rejected() {
        let err = LogEntry::from_response_json("{}").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_entry_without_verification() {
        let json = r#"{"abc": {"body": "e30=", "logIndex": 1}}"#;
        let entry = LogEntry::from_response_json(json).unwrap();
        assert!(entry.inclusion_proof().is_none());
        assert_eq!(entry.body.decode().unwrap(), b"{}");
    }
}

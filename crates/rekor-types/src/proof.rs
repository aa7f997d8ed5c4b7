//! Consistency proof as returned by `GET /api/v1/log/proof`

use crate::encoding::Hex;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Consistency proof between two tree sizes of one log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyProof {
    /// Proof hashes (hex), in the order the server produced them
    #[serde(default)]
    pub hashes: Vec<Hex>,
    /// Root hash of the larger tree (hex)
    pub root_hash: Hex,
}

impl ConsistencyProof {
    /// Parse from the proof JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

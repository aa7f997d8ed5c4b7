//! Checkpoint types
//!
//! `Checkpoint` is the JSON log-info document returned by `GET /api/v1/log`.
//! Its `signedTreeHead` field carries the same state as a signed note, whose
//! format is specified in
//! https://github.com/transparency-dev/formats/blob/main/log/README.md

use crate::encoding::{Base64, Hex, Sha256Hash};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Latest state of a Rekor log as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Inactive shards, passed through untouched
    #[serde(default)]
    pub inactive_shards: Vec<serde_json::Value>,
    /// Root hash of the active tree (hex)
    pub root_hash: Hex,
    /// Signed note committing to the tree state
    pub signed_tree_head: String,
    /// Tree ID of the active shard
    #[serde(rename = "treeID")]
    pub tree_id: String,
    /// Number of leaves in the active tree
    pub tree_size: u64,
}

impl Checkpoint {
    /// Parse from the log-info JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the embedded signed tree head
    pub fn signed_tree_head(&self) -> Result<SignedTreeHead> {
        SignedTreeHead::from_text(&self.signed_tree_head)
    }
}

/// The identifying state of one log tree: what a monitor remembers between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeState {
    #[serde(rename = "treeID")]
    pub tree_id: String,
    pub tree_size: u64,
    pub root_hash: Hex,
}

impl TreeState {
    pub fn new(tree_id: impl Into<String>, tree_size: u64, root_hash: Hex) -> Self {
        Self {
            tree_id: tree_id.into(),
            tree_size,
            root_hash,
        }
    }
}

impl From<&Checkpoint> for TreeState {
    fn from(checkpoint: &Checkpoint) -> Self {
        Self {
            tree_id: checkpoint.tree_id.clone(),
            tree_size: checkpoint.tree_size,
            root_hash: checkpoint.root_hash.clone(),
        }
    }
}

/// A signature line of a signed note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSignature {
    /// Signer name (appears after the em dash)
    pub name: String,
    /// Key hint: first 4 bytes of the decoded signature
    pub key_id: [u8; 4],
    /// Signature bytes following the key hint
    pub signature: Vec<u8>,
}

/// A parsed signed tree head (checkpoint note)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTreeHead {
    /// The origin string identifying the log
    pub origin: String,
    /// Tree size (number of leaves)
    pub tree_size: u64,
    /// Root hash of the Merkle tree
    pub root_hash: Sha256Hash,
    /// Extension lines such as `Timestamp: ...`
    pub other_content: Vec<String>,
    /// Signatures over the note body
    pub signatures: Vec<NoteSignature>,
}

impl SignedTreeHead {
    /// Parse a checkpoint from its text representation
    ///
    /// Format:
    /// ```text
    /// <origin>
    /// <tree_size>
    /// <root_hash_base64>
    /// [other_content...]
    ///
    /// — <name> <key_id_and_sig_base64>
    /// [additional signatures...]
    /// ```
    pub fn from_text(text: &str) -> Result<Self> {
        let (body, sigs) = text
            .split_once("\n\n")
            .ok_or_else(|| Error::InvalidCheckpoint("missing signature block".to_string()))?;

        let mut lines = body.lines();

        let origin = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Error::InvalidCheckpoint("missing origin".to_string()))?
            .to_string();

        let tree_size = lines
            .next()
            .ok_or_else(|| Error::InvalidCheckpoint("missing tree size".to_string()))?
            .parse()
            .map_err(|_| Error::InvalidCheckpoint("invalid tree size".to_string()))?;

        let root_hash_b64 = lines
            .next()
            .ok_or_else(|| Error::InvalidCheckpoint("missing root hash".to_string()))?;
        let root_hash = Sha256Hash::from_base64(root_hash_b64)
            .map_err(|e| Error::InvalidCheckpoint(format!("invalid root hash: {}", e)))?;

        let other_content = lines.map(str::to_string).collect();

        let mut signatures = Vec::new();
        for line in sigs.lines().filter(|l| !l.is_empty()) {
            signatures.push(parse_signature_line(line)?);
        }
        if signatures.is_empty() {
            return Err(Error::InvalidCheckpoint("no signatures".to_string()));
        }

        Ok(SignedTreeHead {
            origin,
            tree_size,
            root_hash,
            other_content,
            signatures,
        })
    }

    /// Encode the note body (everything a signature covers)
    pub fn to_signed_note_body(&self) -> String {
        let mut result = format!(
            "{}\n{}\n{}\n",
            self.origin,
            self.tree_size,
            self.root_hash.to_base64()
        );

        for line in &self.other_content {
            result.push_str(line);
            result.push('\n');
        }

        result
    }
}

fn parse_signature_line(line: &str) -> Result<NoteSignature> {
    let content = line
        .strip_prefix("\u{2014} ")
        .ok_or_else(|| Error::InvalidCheckpoint(format!("not a signature line: {}", line)))?;

    let (name, key_and_sig) = content
        .split_once(' ')
        .ok_or_else(|| Error::InvalidCheckpoint("invalid signature line format".to_string()))?;

    let decoded = Base64::new(key_and_sig)
        .decode()
        .map_err(|_| Error::InvalidCheckpoint("invalid signature base64".to_string()))?;

    if decoded.len() < 5 {
        return Err(Error::InvalidCheckpoint(
            "signature too short for key_id".to_string(),
        ));
    }

    let mut key_id = [0u8; 4];
    key_id.copy_from_slice(&decoded[..4]);

    Ok(NoteSignature {
        name: name.to_string(),
        key_id,
        signature: decoded[4..].to_vec(),
    })
}

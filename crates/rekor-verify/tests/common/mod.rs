//! An in-memory log that signs, appends and proves entries for the tests

#![allow(dead_code)]

use rekor_crypto::{sha256, KeyPair};
use rekor_merkle::{LogHasher, Rfc6962Hasher};
use rekor_types::{
    Base64, Checkpoint, ConsistencyProof, Hex, InclusionProof, LogEntry, Sha256Hash,
    Verification,
};

pub const TREE_ID: &str = "1193050959916656506";
pub const ORIGIN: &str = "rekor.example.dev";

/// A hashedrekord body recording `signer`'s signature over `artifact`
///
/// `key_pem` is stored as the verification material; pass a certificate or
/// a bare public key.
pub fn hashedrekord_body(signer: &KeyPair, key_pem: &str, artifact: &[u8]) -> Base64 {
    let signature = signer.sign(artifact).unwrap();
    let body = serde_json::json!({
        "apiVersion": "0.0.1",
        "kind": "hashedrekord",
        "spec": {
            "data": {
                "hash": {
                    "algorithm": "sha256",
                    "value": hex::encode(sha256(artifact)),
                }
            },
            "signature": {
                "content": Base64::encode(signature.as_bytes()).as_str(),
                "publicKey": {
                    "content": Base64::encode(key_pem.as_bytes()).as_str(),
                }
            }
        }
    });
    Base64::encode(body.to_string().as_bytes())
}

/// Append-only log over canonical entry bodies
pub struct TestLog {
    hasher: Rfc6962Hasher,
    bodies: Vec<Base64>,
    leaves: Vec<Sha256Hash>,
}

impl TestLog {
    /// A log already holding `filler` unrelated entries
    pub fn new(filler: usize) -> Self {
        let mut log = Self {
            hasher: Rfc6962Hasher,
            bodies: Vec::new(),
            leaves: Vec::new(),
        };
        for i in 0..filler {
            log.append(Base64::encode(format!("{{\"filler\":{}}}", i).as_bytes()));
        }
        log
    }

    pub fn append(&mut self, body: Base64) -> u64 {
        let bytes = body.decode().unwrap();
        self.leaves.push(self.hasher.hash_leaf(&bytes));
        self.bodies.push(body);
        (self.bodies.len() - 1) as u64
    }

    pub fn size(&self) -> u64 {
        self.leaves.len() as u64
    }

    pub fn root(&self, size: u64) -> Sha256Hash {
        self.mth(&self.leaves[..size as usize])
    }

    /// Entry at `index` with an inclusion proof against the current tree
    pub fn entry(&self, index: u64) -> LogEntry {
        let size = self.size();
        let root = self.root(size);
        let hashes = self
            .path(index as usize, &self.leaves)
            .iter()
            .map(|h| Hex::new(h.to_hex()))
            .collect();

        LogEntry {
            uuid: format!("{:064x}", index),
            body: self.bodies[index as usize].clone(),
            integrated_time: 1_700_000_000,
            log_id: String::new(),
            log_index: index as i64,
            verification: Some(Verification {
                inclusion_proof: Some(InclusionProof {
                    checkpoint: signed_tree_head(size, &root),
                    hashes,
                    log_index: index as i64,
                    root_hash: Hex::new(root.to_hex()),
                    tree_size: size as i64,
                }),
                signed_entry_timestamp: None,
            }),
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        let size = self.size();
        let root = self.root(size);
        Checkpoint {
            inactive_shards: Vec::new(),
            root_hash: Hex::new(root.to_hex()),
            signed_tree_head: signed_tree_head(size, &root),
            tree_id: TREE_ID.to_string(),
            tree_size: size,
        }
    }

    pub fn consistency_proof(&self, first: u64, last: u64) -> ConsistencyProof {
        let hashes = if first == 0 || first == last {
            Vec::new()
        } else {
            self.subproof(first as usize, &self.leaves[..last as usize], true)
        };
        ConsistencyProof {
            hashes: hashes.iter().map(|h| Hex::new(h.to_hex())).collect(),
            root_hash: Hex::new(self.root(last).to_hex()),
        }
    }

    fn mth(&self, leaves: &[Sha256Hash]) -> Sha256Hash {
        if leaves.len() == 1 {
            return leaves[0];
        }
        let k = split_point(leaves.len());
        self.hasher
            .hash_children(&self.mth(&leaves[..k]), &self.mth(&leaves[k..]))
    }

    fn path(&self, m: usize, leaves: &[Sha256Hash]) -> Vec<Sha256Hash> {
        if leaves.len() <= 1 {
            return Vec::new();
        }
        let k = split_point(leaves.len());
        if m < k {
            let mut proof = self.path(m, &leaves[..k]);
            proof.push(self.mth(&leaves[k..]));
            proof
        } else {
            let mut proof = self.path(m - k, &leaves[k..]);
            proof.push(self.mth(&leaves[..k]));
            proof
        }
    }

    fn subproof(&self, m: usize, leaves: &[Sha256Hash], complete: bool) -> Vec<Sha256Hash> {
        if m == leaves.len() {
            return if complete {
                Vec::new()
            } else {
                vec![self.mth(leaves)]
            };
        }
        let k = split_point(leaves.len());
        if m <= k {
            let mut proof = self.subproof(m, &leaves[..k], complete);
            proof.push(self.mth(&leaves[k..]));
            proof
        } else {
            let mut proof = self.subproof(m - k, &leaves[k..], false);
            proof.push(self.mth(&leaves[..k]));
            proof
        }
    }
}

/// Note text for a tree of `size` leaves; the signature is not checked
pub fn signed_tree_head(size: u64, root: &Sha256Hash) -> String {
    format!(
        "{} - {}\n{}\n{}\n\n\u{2014} {} AAAAAAAA\n",
        ORIGIN,
        TREE_ID,
        size,
        root.to_base64(),
        ORIGIN
    )
}

/// Largest power of two smaller than `n`
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k << 1 < n {
        k <<= 1;
    }
    k
}

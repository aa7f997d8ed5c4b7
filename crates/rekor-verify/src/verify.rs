//! High-level verification API
//!
//! An entry moves through the stages
//! `Fetched -> LeafHashed -> InclusionChecked -> SignatureChecked`.
//! The inclusion and signature checks both run and are reported separately;
//! the entry is valid only when both pass.

use crate::config::VerifyConfig;
use crate::error::{Error, Result};
use crate::leaf::compute_leaf_hash;
use crate::source::LogSource;
use rekor_crypto::{parse_certificate_info, verify_artifact_signature, CertificateInfo, PublicKey};
use rekor_merkle::LogHasher;
use rekor_types::{
    Checkpoint, ConsistencyProof, EntryBody, Hex, InclusionProof, LogEntry, SignedTreeHead,
    TreeState,
};
use std::fmt;

/// Progress of an entry through verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetched,
    LeafHashed,
    InclusionChecked,
    SignatureChecked,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetched => "fetched",
            Stage::LeafHashed => "leaf-hashed",
            Stage::InclusionChecked => "inclusion-checked",
            Stage::SignatureChecked => "signature-checked",
        };
        f.write_str(name)
    }
}

/// Aggregate outcome of an entry verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Error),
}

/// Result of verifying one log entry
#[derive(Debug, Clone)]
pub struct EntryReport<T> {
    /// UUID of the entry
    pub uuid: String,
    /// Global log index of the entry
    pub log_index: i64,
    /// Recomputed leaf hash
    pub leaf_hash: T,
    /// Outcome of the inclusion check
    pub inclusion: Result<()>,
    /// Outcome of the artifact digest and signature check
    pub signature: Result<()>,
    /// Signing certificate details, collected when debugging
    pub certificate: Option<CertificateInfo>,
}

impl<T> EntryReport<T> {
    /// Whether both checks passed
    pub fn is_valid(&self) -> bool {
        self.inclusion.is_ok() && self.signature.is_ok()
    }

    /// Collapse the two checks into one verdict, inclusion failures first
    pub fn verdict(&self) -> Verdict {
        match (&self.inclusion, &self.signature) {
            (Err(e), _) | (Ok(()), Err(e)) => Verdict::Invalid(e.clone()),
            (Ok(()), Ok(())) => Verdict::Valid,
        }
    }

    /// The first failure, if any
    pub fn into_result(self) -> Result<()> {
        self.inclusion?;
        self.signature
    }
}

/// A verifier for Rekor log entries and checkpoints
///
/// The hasher and configuration are owned by the verifier; nothing is
/// shared between calls.
#[derive(Debug, Clone)]
pub struct Verifier<H> {
    hasher: H,
    config: VerifyConfig,
}

impl<H: LogHasher> Verifier<H> {
    /// Create a new verifier
    pub fn new(hasher: H, config: VerifyConfig) -> Self {
        Self { hasher, config }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Verify that `entry` is included in the log and that it records a
    /// valid signature over `artifact`
    ///
    /// Returns `Err` only when verification cannot start: the entry carries
    /// no inclusion proof or its body cannot be decoded. Otherwise both
    /// checks run and their outcomes are in the report.
    pub fn verify_entry(&self, entry: &LogEntry, artifact: &[u8]) -> Result<EntryReport<H::Hash>> {
        tracing::debug!(uuid = %entry.uuid, log_index = entry.log_index, stage = %Stage::Fetched);

        let proof = entry.inclusion_proof().ok_or_else(|| {
            Error::MalformedEntry(format!(
                "entry {} carries no inclusion proof",
                entry.log_index
            ))
        })?;

        let leaf_hash = compute_leaf_hash(&self.hasher, &entry.body)?;
        tracing::debug!(
            leaf_hash = %hex::encode(leaf_hash.as_ref()),
            stage = %Stage::LeafHashed
        );

        let inclusion = self.check_inclusion(proof, &leaf_hash);
        tracing::debug!(ok = inclusion.is_ok(), stage = %Stage::InclusionChecked);

        let mut certificate = None;
        let signature = self.check_signature(entry, artifact, &mut certificate);
        tracing::debug!(ok = signature.is_ok(), stage = %Stage::SignatureChecked);

        Ok(EntryReport {
            uuid: entry.uuid.clone(),
            log_index: entry.log_index,
            leaf_hash,
            inclusion,
            signature,
            certificate,
        })
    }

    /// Verify that `previous` is a prefix of the tree described by `latest`
    pub fn verify_consistency(
        &self,
        previous: &TreeState,
        latest: &Checkpoint,
        proof: &ConsistencyProof,
    ) -> Result<()> {
        if previous.tree_id != latest.tree_id {
            return Err(Error::CheckpointMismatch(format!(
                "tree ID {} does not match latest tree ID {}",
                previous.tree_id, latest.tree_id
            )));
        }

        let old_root = self.decode_hash(&previous.root_hash, "previous root hash")?;
        let new_root = self.decode_hash(&latest.root_hash, "latest root hash")?;
        let proof_root = self.decode_hash(&proof.root_hash, "proof root hash")?;
        if proof_root != new_root {
            return Err(Error::CheckpointMismatch(format!(
                "consistency proof is for root {}, latest checkpoint has {}",
                proof.root_hash, latest.root_hash
            )));
        }

        let hashes = self.decode_hashes(&proof.hashes)?;
        tracing::debug!(
            tree_id = %latest.tree_id,
            first_size = previous.tree_size,
            last_size = latest.tree_size,
            proof_len = hashes.len(),
            "verifying consistency"
        );

        rekor_merkle::verify_consistency(
            &self.hasher,
            previous.tree_size,
            latest.tree_size,
            &hashes,
            &old_root,
            &new_root,
        )?;
        Ok(())
    }

    /// Check that a checkpoint's signed tree head agrees with its JSON fields
    pub fn verify_checkpoint(&self, checkpoint: &Checkpoint) -> Result<SignedTreeHead> {
        let sth = checkpoint.signed_tree_head().map_err(|e| {
            Error::CheckpointMismatch(format!("unreadable signed tree head: {}", e))
        })?;
        let root = self.decode_hash(&checkpoint.root_hash, "checkpoint root hash")?;

        check_tree_head(&sth, checkpoint.tree_size, root.as_ref())?;

        // Rekor origins read "<hostname> - <tree ID>"
        if let Some((_, tree_id)) = sth.origin.rsplit_once(" - ") {
            if tree_id != checkpoint.tree_id {
                return Err(Error::CheckpointMismatch(format!(
                    "signed tree head origin names tree {}, checkpoint has {}",
                    tree_id, checkpoint.tree_id
                )));
            }
        }

        Ok(sth)
    }

    /// Fetch the entry at `log_index` from `source` and verify it
    ///
    /// Requested indices start at 1; zero and negative values are rejected
    /// before the source is consulted.
    pub fn inclusion_from_source<S: LogSource>(
        &self,
        source: &S,
        log_index: i64,
        artifact: &[u8],
    ) -> Result<EntryReport<H::Hash>> {
        let index = u64::try_from(log_index)
            .ok()
            .filter(|&i| i > 0)
            .ok_or_else(|| {
                Error::InvalidIndex(format!("log index {} is not positive", log_index))
            })?;

        let entry = source.entry_by_index(index).map_err(|e| {
            source_error::<S>(e, Error::MalformedEntry, format!("entry {}", index))
        })?;
        if entry.log_index != log_index {
            return Err(Error::MalformedEntry(format!(
                "requested entry {}, source returned entry {}",
                log_index, entry.log_index
            )));
        }

        self.verify_entry(&entry, artifact)
    }

    /// Fetch the latest checkpoint and a consistency proof from `source` and
    /// verify `previous` against them
    ///
    /// Returns the latest checkpoint, to be remembered for the next run.
    pub fn consistency_from_source<S: LogSource>(
        &self,
        source: &S,
        previous: &TreeState,
    ) -> Result<Checkpoint> {
        let latest = source.latest_checkpoint().map_err(|e| {
            source_error::<S>(e, Error::CheckpointMismatch, "latest checkpoint".to_string())
        })?;
        self.verify_checkpoint(&latest)?;

        let proof = source
            .consistency_proof(previous.tree_size, latest.tree_size, &latest.tree_id)
            .map_err(|e| {
                source_error::<S>(
                    e,
                    Error::MalformedProof,
                    format!(
                        "consistency proof {} -> {}",
                        previous.tree_size, latest.tree_size
                    ),
                )
            })?;

        self.verify_consistency(previous, &latest, &proof)?;
        Ok(latest)
    }

    fn check_inclusion(&self, proof: &InclusionProof, leaf_hash: &H::Hash) -> Result<()> {
        let index = u64::try_from(proof.log_index).map_err(|_| {
            Error::InvalidIndex(format!("proof log index {} is negative", proof.log_index))
        })?;
        let tree_size = u64::try_from(proof.tree_size).map_err(|_| {
            Error::InvalidIndex(format!("proof tree size {} is negative", proof.tree_size))
        })?;

        let path = self.decode_hashes(&proof.hashes)?;
        let root = self.decode_hash(&proof.root_hash, "proof root hash")?;

        rekor_merkle::verify_inclusion(&self.hasher, leaf_hash, index, tree_size, &path, &root)?;

        if self.config.verify_checkpoint && !proof.checkpoint.is_empty() {
            let sth = SignedTreeHead::from_text(&proof.checkpoint).map_err(|e| {
                Error::CheckpointMismatch(format!("unreadable proof checkpoint: {}", e))
            })?;
            check_tree_head(&sth, tree_size, root.as_ref())?;
        }

        Ok(())
    }

    fn check_signature(
        &self,
        entry: &LogEntry,
        artifact: &[u8],
        certificate: &mut Option<CertificateInfo>,
    ) -> Result<()> {
        let body = EntryBody::from_base64(&entry.body)?;

        // rekord entries may carry pgp, minisign or ssh signatures
        if let Some(format) = body.spec().signature.format.as_deref() {
            if format != "x509" {
                return Err(Error::UnsupportedAlgorithm(format!(
                    "{} signature format",
                    format
                )));
            }
        }

        if let Some(recorded) = body.artifact_hash() {
            let algorithm = recorded.hash_algorithm()?;
            let expected = recorded.value.decode()?;
            let actual = rekor_crypto::digest(algorithm, artifact);
            if expected != actual {
                return Err(Error::ArtifactDigestMismatch {
                    expected: hex::encode(expected),
                    actual: hex::encode(actual),
                });
            }
        }

        let key_pem = body.public_key_pem()?;
        let key = PublicKey::from_pem(&key_pem)?;

        if self.config.debug {
            *certificate = certificate_info(&key_pem);
        }

        let signature = body.signature()?;
        verify_artifact_signature(&signature, &key, artifact)?;
        Ok(())
    }

    fn decode_hash(&self, hash: &Hex, what: &str) -> Result<H::Hash> {
        let bytes = hash
            .decode()
            .map_err(|e| Error::MalformedProof(format!("{}: {}", what, e)))?;
        if bytes.len() != self.hasher.size() {
            return Err(Error::MalformedProof(format!(
                "{}: expected {} bytes, got {}",
                what,
                self.hasher.size(),
                bytes.len()
            )));
        }
        <H::Hash as TryFrom<&[u8]>>::try_from(bytes.as_slice())
            .map_err(|_| Error::MalformedProof(format!("{}: invalid hash", what)))
    }

    fn decode_hashes(&self, hashes: &[Hex]) -> Result<Vec<H::Hash>> {
        hashes
            .iter()
            .enumerate()
            .map(|(i, h)| self.decode_hash(h, &format!("proof hash {}", i)))
            .collect()
    }
}

/// Classify a source failure: undecodable data is reported with `malformed`,
/// anything else as unavailable input
fn source_error<S: LogSource>(
    error: S::Error,
    malformed: fn(String) -> Error,
    context: String,
) -> Error {
    let message = format!("{}: {}", context, error);
    if S::is_malformed(&error) {
        malformed(message)
    } else {
        Error::InputUnavailable(message)
    }
}

fn check_tree_head(sth: &SignedTreeHead, tree_size: u64, root: &[u8]) -> Result<()> {
    if sth.tree_size != tree_size {
        return Err(Error::CheckpointMismatch(format!(
            "signed tree head has size {}, expected {}",
            sth.tree_size, tree_size
        )));
    }
    if sth.root_hash.as_ref() != root {
        return Err(Error::CheckpointMismatch(format!(
            "signed tree head has root {}, expected {}",
            sth.root_hash,
            hex::encode(root)
        )));
    }
    Ok(())
}

/// Certificate details for diagnostics; bare public keys have none
fn certificate_info(key_pem: &str) -> Option<CertificateInfo> {
    let parsed = pem::parse(key_pem).ok()?;
    if parsed.tag() != "CERTIFICATE" {
        return None;
    }
    match parse_certificate_info(parsed.contents()) {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!("could not read signing certificate details: {}", e);
            None
        }
    }
}

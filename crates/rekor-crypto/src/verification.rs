//! Signature verification using aws-lc-rs

use crate::error::{Error, Result};
use crate::key::PublicKey;
use aws_lc_rs::signature::{
    UnparsedPublicKey, VerificationAlgorithm, ECDSA_P256_SHA256_ASN1, ECDSA_P384_SHA384_ASN1,
    ED25519, RSA_PKCS1_2048_8192_SHA256,
};
use std::fmt;

/// Signature schemes accepted for artifact signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// ECDSA P-256 with SHA-256
    EcdsaP256Sha256,
    /// ECDSA P-384 with SHA-384
    EcdsaP384Sha384,
    /// Ed25519
    Ed25519,
    /// RSA PKCS#1 v1.5 with SHA-256
    RsaPkcs1Sha256,
}

impl SigningScheme {
    /// Get the name of this scheme
    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
            SigningScheme::EcdsaP384Sha384 => "ECDSA_P384_SHA384",
            SigningScheme::Ed25519 => "ED25519",
            SigningScheme::RsaPkcs1Sha256 => "RSA_PKCS1_SHA256",
        }
    }

    fn algorithm(&self) -> &'static dyn VerificationAlgorithm {
        match self {
            SigningScheme::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1,
            SigningScheme::EcdsaP384Sha384 => &ECDSA_P384_SHA384_ASN1,
            SigningScheme::Ed25519 => &ED25519,
            SigningScheme::RsaPkcs1Sha256 => &RSA_PKCS1_2048_8192_SHA256,
        }
    }
}

impl fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verify a signature over `data` with raw key bytes
///
/// `public_key` is the SPKI `subjectPublicKey` content: an uncompressed EC
/// point, a 32-byte Ed25519 key or a PKCS#1 `RSAPublicKey`.
pub fn verify_signature(
    public_key: &[u8],
    data: &[u8],
    signature: &[u8],
    scheme: SigningScheme,
) -> Result<()> {
    let key = UnparsedPublicKey::new(scheme.algorithm(), public_key);
    key.verify(data, signature)
        .map_err(|_| Error::SignatureInvalid(format!("{} signature does not verify", scheme)))
}

/// Verify that `signature` over `artifact` was made by `public_key`
pub fn verify_artifact_signature(
    signature: &[u8],
    public_key: &PublicKey,
    artifact: &[u8],
) -> Result<()> {
    tracing::debug!(
        scheme = %public_key.scheme(),
        signature_len = signature.len(),
        artifact_len = artifact.len(),
        "verifying artifact signature"
    );
    public_key.verify(artifact, signature)
}

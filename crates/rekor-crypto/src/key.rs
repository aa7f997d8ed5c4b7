//! Public keys extracted from certificates and SPKI documents

use crate::error::{Error, Result};
use crate::verification::{verify_signature, SigningScheme};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;
use x509_cert::der::Decode;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::Certificate;

/// A verification key together with the scheme it must be used with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    scheme: SigningScheme,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Create a key from raw `subjectPublicKey` bytes
    pub fn new(bytes: Vec<u8>, scheme: SigningScheme) -> Self {
        Self { scheme, bytes }
    }

    /// Parse a PEM document holding either a `CERTIFICATE` or a `PUBLIC KEY`
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let parsed =
            pem::parse(pem_str).map_err(|e| Error::Pem(format!("failed to parse PEM: {}", e)))?;

        match parsed.tag() {
            "CERTIFICATE" => Self::from_certificate_der(parsed.contents()),
            "PUBLIC KEY" => Self::from_spki_der(parsed.contents()),
            other => Err(Error::Pem(format!(
                "expected CERTIFICATE or PUBLIC KEY PEM block, got {}",
                other
            ))),
        }
    }

    /// Extract the subject public key of a DER-encoded certificate
    pub fn from_certificate_der(cert_der: &[u8]) -> Result<Self> {
        let cert = Certificate::from_der(cert_der)
            .map_err(|e| Error::InvalidCertificate(format!("failed to parse certificate: {}", e)))?;
        Self::from_spki(&cert.tbs_certificate.subject_public_key_info)
    }

    /// Parse a DER-encoded SubjectPublicKeyInfo
    pub fn from_spki_der(spki_der: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoOwned::from_der(spki_der)
            .map_err(|e| Error::InvalidKey(format!("failed to parse SPKI: {}", e)))?;
        Self::from_spki(&spki)
    }

    /// Build a key from a decoded SubjectPublicKeyInfo
    pub fn from_spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let scheme = determine_signing_scheme(spki)?;
        let bytes = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| Error::InvalidKey("public key bit string is not octet aligned".into()))?
            .to_vec();

        tracing::debug!(scheme = %scheme, key_len = bytes.len(), "extracted public key");
        Ok(Self { scheme, bytes })
    }

    /// Scheme the key verifies with
    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    /// Raw `subjectPublicKey` bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Verify a signature over data
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        verify_signature(&self.bytes, data, signature, self.scheme)
    }
}

/// Determine the signing scheme from SubjectPublicKeyInfo
///
/// Anything outside the supported set is rejected rather than guessed.
fn determine_signing_scheme(spki: &SubjectPublicKeyInfoOwned) -> Result<SigningScheme> {
    let alg_oid = spki.algorithm.oid;

    if alg_oid == ID_EC_PUBLIC_KEY {
        let params = spki
            .algorithm
            .parameters
            .as_ref()
            .ok_or_else(|| Error::InvalidKey("EC key missing curve parameters".to_string()))?;

        // params.value() holds the raw OID content bytes
        let curve_oid = ObjectIdentifier::from_bytes(params.value())
            .map_err(|e| Error::InvalidKey(format!("failed to parse EC curve OID: {}", e)))?;

        if curve_oid == SECP_256_R_1 {
            Ok(SigningScheme::EcdsaP256Sha256)
        } else if curve_oid == SECP_384_R_1 {
            Ok(SigningScheme::EcdsaP384Sha384)
        } else {
            Err(Error::UnsupportedAlgorithm(format!("EC curve {}", curve_oid)))
        }
    } else if alg_oid == RSA_ENCRYPTION {
        Ok(SigningScheme::RsaPkcs1Sha256)
    } else if alg_oid == ID_ED_25519 {
        Ok(SigningScheme::Ed25519)
    } else {
        Err(Error::UnsupportedAlgorithm(format!("public key algorithm {}", alg_oid)))
    }
}

//! Key generation, signing and self-signed certificates using aws-lc-rs
//!
//! Used to produce signed log entries locally, e.g. when exercising a
//! verifier against entries whose provenance is known.

use crate::error::{Error, Result};
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, Ed25519KeyPair, KeyPair as AwsKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1_SIGNING,
    },
};
use const_oid::db::rfc5280::ID_CE_SUBJECT_ALT_NAME;
use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_256, ECDSA_WITH_SHA_384, ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1,
};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;
use der::asn1::{BitString, Ia5String, OctetString};
use der::{Any, Decode, Encode};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use std::str::FromStr;
use std::time::Duration;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::SubjectAltName;
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Validity;
use x509_cert::{Certificate, TbsCertificate, Version};

/// Lifetime of certificates issued by [`KeyPair::self_signed_certificate_pem`]
const CERTIFICATE_LIFETIME: Duration = Duration::from_secs(600);

/// A cryptographic signature
///
/// This type wraps raw signature bytes. It can be created by signing
/// data with a `KeyPair`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Create a new Signature from raw bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the inner bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A key pair for signing
pub enum KeyPair {
    /// ECDSA P-256 key pair
    EcdsaP256(EcdsaKeyPair),
    /// ECDSA P-384 key pair
    EcdsaP384(EcdsaKeyPair),
    /// Ed25519 key pair
    Ed25519(Ed25519KeyPair),
}

impl KeyPair {
    /// Generate a new ECDSA P-256 key pair
    pub fn generate_ecdsa_p256() -> Result<Self> {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng)
            .map_err(|_| Error::KeyGeneration("failed to generate ECDSA P-256 key".to_string()))?;
        let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref())?;
        Ok(KeyPair::EcdsaP256(key_pair))
    }

    /// Generate a new ECDSA P-384 key pair
    pub fn generate_ecdsa_p384() -> Result<Self> {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, &rng)
            .map_err(|_| Error::KeyGeneration("failed to generate ECDSA P-384 key".to_string()))?;
        let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, pkcs8.as_ref())?;
        Ok(KeyPair::EcdsaP384(key_pair))
    }

    /// Generate a new Ed25519 key pair
    pub fn generate_ed25519() -> Result<Self> {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng)
            .map_err(|_| Error::KeyGeneration("failed to generate Ed25519 key".to_string()))?;
        let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())?;
        Ok(KeyPair::Ed25519(key_pair))
    }

    /// Get the public key bytes
    pub fn public_key_bytes(&self) -> &[u8] {
        match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => kp.public_key().as_ref(),
            KeyPair::Ed25519(kp) => kp.public_key().as_ref(),
        }
    }

    /// Sign data with this key pair
    pub fn sign(&self, data: &[u8]) -> Result<Signature> {
        match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => {
                let rng = SystemRandom::new();
                let sig = kp.sign(&rng, data)?;
                Ok(Signature::new(sig.as_ref().to_vec()))
            }
            KeyPair::Ed25519(kp) => {
                let sig = kp.sign(data);
                Ok(Signature::new(sig.as_ref().to_vec()))
            }
        }
    }

    fn spki_algorithm(&self) -> Result<AlgorithmIdentifierOwned> {
        let curve = match self {
            KeyPair::EcdsaP256(_) => SECP_256_R_1,
            KeyPair::EcdsaP384(_) => SECP_384_R_1,
            KeyPair::Ed25519(_) => {
                return Ok(AlgorithmIdentifierOwned {
                    oid: ID_ED_25519,
                    parameters: None,
                })
            }
        };

        Ok(AlgorithmIdentifierOwned {
            oid: ID_EC_PUBLIC_KEY,
            parameters: Some(Any::encode_from(&curve)?),
        })
    }

    fn signature_algorithm(&self) -> ObjectIdentifier {
        match self {
            KeyPair::EcdsaP256(_) => ECDSA_WITH_SHA_256,
            KeyPair::EcdsaP384(_) => ECDSA_WITH_SHA_384,
            KeyPair::Ed25519(_) => ID_ED_25519,
        }
    }

    /// Get the public key in DER-encoded SubjectPublicKeyInfo format
    pub fn public_key_to_der(&self) -> Result<Vec<u8>> {
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: self.spki_algorithm()?,
            subject_public_key: BitString::from_bytes(self.public_key_bytes())?,
        };
        Ok(spki.to_der()?)
    }

    /// Get the public key in PEM-encoded SubjectPublicKeyInfo format
    pub fn public_key_to_pem(&self) -> Result<String> {
        let der = self.public_key_to_der()?;
        Ok(pem::encode(&pem::Pem::new("PUBLIC KEY", der)))
    }

    /// Issue a short-lived self-signed certificate for this key
    ///
    /// `email`, when given, is placed in the subject alternative name the
    /// way signing-certificate identities are.
    pub fn self_signed_certificate_pem(
        &self,
        common_name: &str,
        email: Option<&str>,
    ) -> Result<String> {
        let name = Name::from_str(&format!("CN={}", common_name))
            .map_err(|e| Error::InvalidCertificate(format!("invalid subject: {}", e)))?;
        let signature_algorithm = AlgorithmIdentifierOwned {
            oid: self.signature_algorithm(),
            parameters: None,
        };

        let extensions = match email {
            Some(email) => {
                let san = SubjectAltName(vec![GeneralName::Rfc822Name(Ia5String::new(email)?)]);
                Some(vec![Extension {
                    extn_id: ID_CE_SUBJECT_ALT_NAME,
                    critical: false,
                    extn_value: OctetString::new(san.to_der()?)?,
                }])
            }
            None => None,
        };

        let tbs_certificate = TbsCertificate {
            version: Version::V3,
            serial_number: SerialNumber::new(&[0x01])?,
            signature: signature_algorithm.clone(),
            issuer: name.clone(),
            validity: Validity::from_now(CERTIFICATE_LIFETIME)?,
            subject: name,
            subject_public_key_info: SubjectPublicKeyInfoOwned::from_der(
                &self.public_key_to_der()?,
            )?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions,
        };

        let signature = self.sign(&tbs_certificate.to_der()?)?;
        let certificate = Certificate {
            tbs_certificate,
            signature_algorithm,
            signature: BitString::from_bytes(signature.as_bytes())?,
        };

        Ok(pem::encode(&pem::Pem::new(
            "CERTIFICATE",
            certificate.to_der()?,
        )))
    }
}

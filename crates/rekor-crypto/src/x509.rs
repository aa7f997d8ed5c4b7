//! X.509 certificate utilities
//!
//! Signing certificates embedded in Rekor entries are only used for their
//! public key; the identity and validity fields extracted here are reported
//! in diagnostics and are not enforced.

use crate::error::{Error, Result};
use crate::key::PublicKey;
use const_oid::ObjectIdentifier;
use x509_cert::der::Decode;
use x509_cert::Certificate;

/// Fulcio issuer OID: 1.3.6.1.4.1.57264.1.1
/// This extension contains the OIDC issuer URL
const FULCIO_ISSUER_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.1");

/// Information extracted from a certificate
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    /// Subject distinguished name
    pub subject: String,
    /// Identity from SAN extension (email or URI)
    pub identity: Option<String>,
    /// OIDC issuer URL from the Fulcio extension
    pub issuer: Option<String>,
    /// Not valid before (Unix timestamp)
    pub not_before: i64,
    /// Not valid after (Unix timestamp)
    pub not_after: i64,
    /// Subject public key
    pub public_key: PublicKey,
}

/// Parse certificate information from DER-encoded certificate
pub fn parse_certificate_info(cert_der: &[u8]) -> Result<CertificateInfo> {
    let cert = Certificate::from_der(cert_der)
        .map_err(|e| Error::InvalidCertificate(format!("failed to parse certificate: {}", e)))?;

    let validity = &cert.tbs_certificate.validity;
    let not_before = validity.not_before.to_unix_duration().as_secs() as i64;
    let not_after = validity.not_after.to_unix_duration().as_secs() as i64;

    let public_key = PublicKey::from_spki(&cert.tbs_certificate.subject_public_key_info)?;

    let identity = extract_san_identity(&cert)?;
    let issuer = extract_fulcio_issuer(&cert);

    tracing::debug!(
        subject = %cert.tbs_certificate.subject,
        identity = identity.as_deref().unwrap_or("<none>"),
        not_before,
        not_after,
        "parsed signing certificate"
    );

    Ok(CertificateInfo {
        subject: cert.tbs_certificate.subject.to_string(),
        identity,
        issuer,
        not_before,
        not_after,
        public_key,
    })
}

/// Extract identity from Subject Alternative Name (SAN) extension
///
/// Returns the first email address or URI.
pub fn extract_san_identity(cert: &Certificate) -> Result<Option<String>> {
    use x509_cert::ext::pkix::name::GeneralName;
    use x509_cert::ext::pkix::SubjectAltName;

    // Returns Option<(critical, extension)>
    let san_opt: Option<(bool, SubjectAltName)> = cert
        .tbs_certificate
        .get()
        .map_err(|e| Error::InvalidCertificate(format!("failed to get SAN extension: {}", e)))?;

    let Some((_critical, san)) = san_opt else {
        return Ok(None);
    };

    for name in san.0.iter() {
        match name {
            GeneralName::Rfc822Name(email) => return Ok(Some(email.to_string())),
            GeneralName::UniformResourceIdentifier(uri) => return Ok(Some(uri.to_string())),
            _ => continue,
        }
    }

    Ok(None)
}

/// Extract the OIDC issuer from Fulcio certificate extension
fn extract_fulcio_issuer(cert: &Certificate) -> Option<String> {
    let extensions = cert.tbs_certificate.extensions.as_ref()?;

    let ext = extensions
        .iter()
        .find(|ext| ext.extn_id == FULCIO_ISSUER_OID)?;

    // Raw UTF-8 in the OCTET STRING
    std::str::from_utf8(ext.extn_value.as_bytes())
        .ok()
        .map(str::to_string)
}

//! Embedded driver credential
//!
//! The tty framebuffer driver is signed by a private root. That root's
//! certificate ships inside the binary and is handed to the system keychain
//! verbatim.

use super::error::InstallerError;

/// PEM certificate trusted as a root so the driver signature verifies
pub static DRIVER_CREDENTIAL: &[u8] = include_bytes!("../../assets/tty_driver.pem");

/// Check that `payload` is a well-formed PEM `CERTIFICATE` block
///
/// Only structure is checked. Validity dates are ignored since the keychain
/// entry is what the driver loader consults, not this check.
pub fn validate_credential(payload: &[u8]) -> Result<(), InstallerError> {
    let block = pem::parse(payload)
        .map_err(|e| InstallerError::InvalidCredential(format!("not PEM encoded: {e}")))?;

    if block.tag() != "CERTIFICATE" {
        return Err(InstallerError::InvalidCredential(format!(
            "expected a CERTIFICATE block, found {}",
            block.tag()
        )));
    }

    let (_, cert) = x509_parser::parse_x509_certificate(block.contents())
        .map_err(|e| InstallerError::InvalidCredential(format!("malformed X.509: {e}")))?;

    log::debug!("Driver credential subject: {}", cert.subject());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_credential_is_a_certificate() {
        assert!(DRIVER_CREDENTIAL.starts_with(b"-----BEGIN CERTIFICATE-----\n"));
        assert!(DRIVER_CREDENTIAL.ends_with(b"-----END CERTIFICATE-----"));
        validate_credential(DRIVER_CREDENTIAL).unwrap();
    }

    #[test]
    fn embedded_credential_names_the_driver_vendor() {
        let block = pem::parse(DRIVER_CREDENTIAL).unwrap();
        let (_, cert) = x509_parser::parse_x509_certificate(block.contents()).unwrap();
        let cn = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok());
        assert_eq!(cn, Some("Verisign Ltd"));
    }

    #[test]
    fn rejects_garbage() {
        let err = validate_credential(b"not a certificate").unwrap_err();
        assert!(matches!(err, InstallerError::InvalidCredential(_)));
    }

    #[test]
    fn rejects_non_certificate_blocks() {
        let key = pem::encode(&pem::Pem::new("PRIVATE KEY", vec![1, 2, 3]));
        let err = validate_credential(key.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("PRIVATE KEY"));
    }

    #[test]
    fn rejects_malformed_der() {
        let bogus = pem::encode(&pem::Pem::new("CERTIFICATE", vec![0x30, 0x03, 0x01]));
        let err = validate_credential(bogus.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("malformed X.509"));
    }
}

//! Credential Providers
//!
//! The identity a peer presents during a TLS handshake is supplied through
//! the `CredentialProvider` capability. Providers are consulted on every
//! handshake, so credentials rotated on disk are picked up without a
//! process restart.

use crate::error::HandshakeError;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use std::path::PathBuf;

/// A leaf certificate chain and its private key
#[derive(Debug)]
pub struct TlsIdentity {
    pub cert_chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

/// Capability for supplying the local TLS identity.
///
/// `load` runs once per handshake. A failure aborts only that handshake;
/// the listener and any established connections are unaffected.
pub trait CredentialProvider: std::fmt::Debug + Send + Sync {
    fn load(&self) -> Result<TlsIdentity, HandshakeError>;
}

/// Credential provider reading PEM files on every handshake
#[derive(Debug, Clone)]
pub struct PemFileCredentials {
    cert_path: PathBuf,
    key_path: PathBuf,
}

impl PemFileCredentials {
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }
}

impl CredentialProvider for PemFileCredentials {
    fn load(&self) -> Result<TlsIdentity, HandshakeError> {
        let cert_chain = CertificateDer::pem_file_iter(&self.cert_path)
            .map_err(|e| {
                HandshakeError::Credential(format!(
                    "failed to read {}: {}",
                    self.cert_path.display(),
                    e
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                HandshakeError::Credential(format!(
                    "failed to parse certificate in {}: {}",
                    self.cert_path.display(),
                    e
                ))
            })?;

        if cert_chain.is_empty() {
            return Err(HandshakeError::Credential(format!(
                "no certificates found in {}",
                self.cert_path.display()
            )));
        }

        let key = PrivateKeyDer::from_pem_file(&self.key_path).map_err(|e| {
            HandshakeError::Credential(format!(
                "failed to read key {}: {}",
                self.key_path.display(),
                e
            ))
        })?;

        Ok(TlsIdentity { cert_chain, key })
    }
}

/// Credential provider holding a fixed in-memory identity
#[derive(Debug)]
pub struct StaticCredentials {
    cert_chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl StaticCredentials {
    pub fn new(cert_chain: Vec<CertificateDer<'static>>, key: PrivateKeyDer<'static>) -> Self {
        Self { cert_chain, key }
    }
}

impl CredentialProvider for StaticCredentials {
    fn load(&self) -> Result<TlsIdentity, HandshakeError> {
        Ok(TlsIdentity {
            cert_chain: self.cert_chain.clone(),
            key: self.key.clone_key(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustls::pki_types::PrivatePkcs8KeyDer;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cattery_creds_{}_{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_pem_files_load() {
        let dir = scratch_dir("ok");
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_path = dir.join("cert.pem");
        let key_path = dir.join("key.pem");
        std::fs::write(&cert_path, cert.cert.pem()).unwrap();
        std::fs::write(&key_path, cert.key_pair.serialize_pem()).unwrap();

        let provider = PemFileCredentials::new(&cert_path, &key_path);
        let identity = provider.load().unwrap();
        assert_eq!(identity.cert_chain.len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_cert_file_is_credential_error() {
        let provider = PemFileCredentials::new("/nonexistent/cert.pem", "/nonexistent/key.pem");

        let err = provider.load().unwrap_err();
        assert!(matches!(err, HandshakeError::Credential(_)));
        assert!(err.to_string().contains("/nonexistent/cert.pem"));
    }

    #[test]
    fn test_garbage_cert_file_is_credential_error() {
        let dir = scratch_dir("garbage");
        let cert_path = dir.join("cert.pem");
        std::fs::write(&cert_path, "this is not pem").unwrap();

        let provider = PemFileCredentials::new(&cert_path, dir.join("missing-key.pem"));
        let err = provider.load().unwrap_err();
        assert!(matches!(err, HandshakeError::Credential(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_static_credentials_load_repeatedly() {
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let key = PrivatePkcs8KeyDer::from(cert.key_pair.serialize_der());
        let provider =
            StaticCredentials::new(vec![CertificateDer::from(cert.cert)], key.into());

        // The key is re-cloned per handshake
        assert!(provider.load().is_ok());
        assert!(provider.load().is_ok());
    }
}

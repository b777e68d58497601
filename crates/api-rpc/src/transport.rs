//! Mutual-TLS Transport Configuration
//!
//! Both sides validate the peer against the same trusted-issuer bundle.
//! The bundle is loaded once and immutable afterwards; the local identity
//! is resolved through a `CredentialProvider` on every handshake.

use crate::credentials::CredentialProvider;
use crate::error::HandshakeError;
use rustls::client::ResolvesClientCert;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::CertificateDer;
use rustls::server::{ClientHello, ResolvesServerCert, WebPkiClientVerifier};
use rustls::sign::CertifiedKey;
use rustls::{RootCertStore, SignatureScheme};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Install the ring crypto provider (idempotent, first install wins)
fn ensure_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Load every certificate of a PEM bundle into a root store
pub fn load_trust_bundle(path: impl AsRef<Path>) -> Result<RootCertStore, HandshakeError> {
    let path = path.as_ref();

    let certs = CertificateDer::pem_file_iter(path)
        .map_err(|e| {
            HandshakeError::TrustBundle(format!("failed to read {}: {}", path.display(), e))
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            HandshakeError::TrustBundle(format!(
                "failed to parse certificate in {}: {}",
                path.display(),
                e
            ))
        })?;

    let mut roots = RootCertStore::empty();
    for cert in certs {
        roots.add(cert).map_err(|e| {
            HandshakeError::TrustBundle(format!(
                "rejected issuer certificate in {}: {}",
                path.display(),
                e
            ))
        })?;
    }

    if roots.is_empty() {
        return Err(HandshakeError::TrustBundle(format!(
            "no issuer certificates found in {}",
            path.display()
        )));
    }

    Ok(roots)
}

/// Server-side TLS configuration: client certificates are required and
/// verified against `trusted_issuers`; the server identity comes from
/// `credentials` at handshake time.
pub fn server_tls_config(
    trusted_issuers: RootCertStore,
    credentials: Arc<dyn CredentialProvider>,
) -> Result<Arc<rustls::ServerConfig>, HandshakeError> {
    ensure_crypto_provider();

    let verifier = WebPkiClientVerifier::builder(Arc::new(trusted_issuers))
        .build()
        .map_err(|e| HandshakeError::TrustBundle(e.to_string()))?;

    let config = rustls::ServerConfig::builder()
        .with_client_cert_verifier(verifier)
        .with_cert_resolver(Arc::new(LazyServerCert { credentials }));

    Ok(Arc::new(config))
}

/// Client-side TLS configuration: the server is verified against
/// `trusted_issuers`; the client identity comes from `credentials` at
/// handshake time.
pub fn client_tls_config(
    trusted_issuers: RootCertStore,
    credentials: Arc<dyn CredentialProvider>,
) -> Result<Arc<rustls::ClientConfig>, HandshakeError> {
    ensure_crypto_provider();

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(trusted_issuers)
        .with_client_cert_resolver(Arc::new(LazyClientCert { credentials }));

    Ok(Arc::new(config))
}

fn certified_key(provider: &dyn CredentialProvider) -> Result<Arc<CertifiedKey>, HandshakeError> {
    let identity = provider.load()?;
    let signing_key = rustls::crypto::ring::sign::any_supported_type(&identity.key)
        .map_err(|e| HandshakeError::Credential(format!("unusable private key: {}", e)))?;

    Ok(Arc::new(CertifiedKey::new(identity.cert_chain, signing_key)))
}

/// Resolves the server certificate through the provider per handshake.
/// Returning `None` makes rustls abort the handshake: fail closed.
#[derive(Debug)]
struct LazyServerCert {
    credentials: Arc<dyn CredentialProvider>,
}

impl ResolvesServerCert for LazyServerCert {
    fn resolve(&self, _client_hello: ClientHello<'_>) -> Option<Arc<CertifiedKey>> {
        match certified_key(self.credentials.as_ref()) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "server credentials unavailable, failing handshake");
                None
            }
        }
    }
}

/// Client-side counterpart of `LazyServerCert`
#[derive(Debug)]
struct LazyClientCert {
    credentials: Arc<dyn CredentialProvider>,
}

impl ResolvesClientCert for LazyClientCert {
    fn resolve(
        &self,
        _root_hint_subjects: &[&[u8]],
        _sigschemes: &[SignatureScheme],
    ) -> Option<Arc<CertifiedKey>> {
        match certified_key(self.credentials.as_ref()) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "client credentials unavailable, failing handshake");
                None
            }
        }
    }

    fn has_certs(&self) -> bool {
        true
    }
}

//! Cattery Client Implementation

use crate::error::Result;
use crate::types::{Cat, CatId, ListCatsRequest, ListCatsResponse};
use cattery_api_rpc::transport::{client_tls_config, load_trust_bundle};
use cattery_api_rpc::types::LIST_CATS_METHOD;
use cattery_api_rpc::{CredentialProvider, PemFileCredentials, RpcChannel};
use rustls::RootCertStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// PEM file locations for mutual TLS.
///
/// `trust_bundle` validates the server's certificate; `cert` and `key` are
/// presented as the client identity. The key pair is re-read from disk on
/// every handshake, so rotated files take effect on the next connection.
#[derive(Debug, Clone)]
pub struct TlsOptions {
    /// CA bundle the server certificate must chain to
    pub trust_bundle: PathBuf,
    /// Client certificate chain, leaf first
    pub cert: PathBuf,
    /// Private key matching `cert`
    pub key: PathBuf,
}

/// Cattery Daemon Client
///
/// Provides a high-level interface to interact with the Cattery daemon over
/// a single mutually-authenticated connection. Calls are serialized on that
/// connection; clone-free sharing is done by wrapping the client in an `Arc`.
///
/// # Example
///
/// ```no_run
/// use cattery_sdk::{CatteryClient, TlsOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tls = TlsOptions {
///     trust_bundle: "certs/minica.pem".into(),
///     cert: "certs/client/cert.pem".into(),
///     key: "certs/client/key.pem".into(),
/// };
/// let client = CatteryClient::connect("localhost:1234", &tls).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CatteryClient {
    channel: Mutex<RpcChannel>,
}

impl CatteryClient {
    /// Connect to the Cattery daemon using PEM files for the TLS material
    ///
    /// # Arguments
    ///
    /// * `addr` - Daemon endpoint as `host:port` (e.g., `localhost:1234`)
    /// * `tls` - Trust bundle and client key pair locations
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cattery_sdk::{CatteryClient, TlsOptions};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let tls = TlsOptions {
    ///     trust_bundle: "certs/minica.pem".into(),
    ///     cert: "certs/client/cert.pem".into(),
    ///     key: "certs/client/key.pem".into(),
    /// };
    /// let client = CatteryClient::connect("localhost:1234", &tls).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(addr: impl AsRef<str>, tls: &TlsOptions) -> Result<Self> {
        let trusted_issuers = load_trust_bundle(&tls.trust_bundle)?;
        let credentials = Arc::new(PemFileCredentials::new(&tls.cert, &tls.key));
        Self::connect_with(addr, trusted_issuers, credentials).await
    }

    /// Connect with an explicit trust store and credential source
    ///
    /// This is the injection point for callers that keep certificates
    /// somewhere other than PEM files on disk.
    pub async fn connect_with(
        addr: impl AsRef<str>,
        trusted_issuers: RootCertStore,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let config = client_tls_config(trusted_issuers, credentials)?;
        let channel = RpcChannel::connect(addr.as_ref(), config).await?;

        Ok(Self {
            channel: Mutex::new(channel),
        })
    }

    /// Fetch a page of cats
    ///
    /// Returns up to `limit` cats with ids greater than `cursor`, newest id
    /// first. Pass the highest id already seen to fetch the next page, or
    /// `0` for the first page.
    ///
    /// # Arguments
    ///
    /// * `cursor` - Exclusive lower bound on cat ids (`0` for the start)
    /// * `limit` - Maximum number of cats to return
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cattery_sdk::{CatteryClient, TlsOptions};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let tls = TlsOptions {
    /// #     trust_bundle: "certs/minica.pem".into(),
    /// #     cert: "certs/client/cert.pem".into(),
    /// #     key: "certs/client/key.pem".into(),
    /// # };
    /// # let client = CatteryClient::connect("localhost:1234", &tls).await?;
    /// let cats = client.list_cats(0, 10).await?;
    /// for cat in &cats {
    ///     println!("{}", cat.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_cats(&self, cursor: CatId, limit: i64) -> Result<Vec<Cat>> {
        let request = ListCatsRequest { cursor, limit };

        let mut channel = self.channel.lock().await;
        let response: ListCatsResponse = channel.call(LIST_CATS_METHOD, &request).await?;

        Ok(response.cats)
    }

    /// Close the connection, flushing the TLS close-notify
    pub async fn close(self) -> Result<()> {
        self.channel.into_inner().close().await?;
        Ok(())
    }
}

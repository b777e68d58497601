//! Shared fixtures for the integration suites: a throwaway certificate
//! authority, PEM material on disk, and seeded cat databases.

use cattery_api_rpc::handler::CatsHandler;
use cattery_api_rpc::server::RpcServerConfig;
use cattery_api_rpc::transport::server_tls_config;
use cattery_api_rpc::{
    shutdown_channel, MethodRegistry, RpcServer, ShutdownSender, StaticCredentials,
};
use cattery_core::port::CatRepository;
use cattery_infra_sqlite::{create_pool, run_migrations};
use cattery_sdk::TlsOptions;
use chrono::Utc;
use rcgen::{BasicConstraints, Certificate, CertificateParams, DnType, IsCa, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Throwaway certificate authority for one test
pub struct TestCa {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl TestCa {
    pub fn new() -> Self {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(Vec::default()).unwrap();
        params
            .distinguished_name
            .push(DnType::CommonName, "cattery test ca");
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let cert = params.self_signed(&key).unwrap();

        Self { cert, key }
    }

    /// Issue an end-entity certificate for `san`
    pub fn issue(&self, san: &str) -> Identity {
        let key = KeyPair::generate().unwrap();
        let params = CertificateParams::new(vec![san.to_string()]).unwrap();
        let cert = params.signed_by(&key, &self.cert, &self.key).unwrap();

        Identity { cert, key }
    }

    /// Issue a server certificate valid for loopback connections
    pub fn issue_server(&self) -> Identity {
        let key = KeyPair::generate().unwrap();
        let params =
            CertificateParams::new(vec!["localhost".to_string(), "127.0.0.1".to_string()])
                .unwrap();
        let cert = params.signed_by(&key, &self.cert, &self.key).unwrap();

        Identity { cert, key }
    }

    pub fn root_store(&self) -> rustls::RootCertStore {
        let mut roots = rustls::RootCertStore::empty();
        roots.add(self.cert.der().clone()).unwrap();
        roots
    }
}

/// An issued certificate and its key pair
pub struct Identity {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl Identity {
    pub fn chain(&self) -> Vec<CertificateDer<'static>> {
        vec![self.cert.der().clone()]
    }

    pub fn key_der(&self) -> PrivateKeyDer<'static> {
        PrivatePkcs8KeyDer::from(self.key.serialize_der()).into()
    }

    pub fn credentials(&self) -> Arc<StaticCredentials> {
        Arc::new(StaticCredentials::new(self.chain(), self.key_der()))
    }
}

/// Unique scratch directory for one test
pub fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cattery_it_{}_{}", tag, std::process::id()));

    // Cleanup previous run
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// PEM files for a CA plus server and client identities, laid out the way
/// the daemon and CLI consume them
pub struct TlsFixture {
    pub dir: PathBuf,
    pub ca: TestCa,
    pub server: Identity,
    pub client: Identity,
    pub ca_bundle: PathBuf,
    pub client_cert: PathBuf,
    pub client_key: PathBuf,
}

impl TlsFixture {
    pub fn new(tag: &str) -> Self {
        let dir = scratch_dir(tag);
        let ca = TestCa::new();
        let server = ca.issue_server();
        let client = ca.issue("cattery-client");

        let ca_bundle = dir.join("minica.pem");
        let client_cert = dir.join("client-cert.pem");
        let client_key = dir.join("client-key.pem");

        std::fs::write(&ca_bundle, ca.cert.pem()).unwrap();
        std::fs::write(&client_cert, client.cert.pem()).unwrap();
        std::fs::write(&client_key, client.key.serialize_pem()).unwrap();

        Self {
            dir,
            ca,
            server,
            client,
            ca_bundle,
            client_cert,
            client_key,
        }
    }

    /// Client-side options pointing at the PEM files
    pub fn client_tls_options(&self) -> TlsOptions {
        TlsOptions {
            trust_bundle: self.ca_bundle.clone(),
            cert: self.client_cert.clone(),
            key: self.client_key.clone(),
        }
    }

    pub fn cleanup(self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// Server TLS config trusting `ca` for client certificates and presenting
/// `identity`
pub fn server_config(ca: &TestCa, identity: &Identity) -> Arc<rustls::ServerConfig> {
    server_tls_config(ca.root_store(), identity.credentials()).unwrap()
}

/// Create a file-backed database under `dir` seeded with `count` cats.
///
/// Ids run 1..=count. Even ids carry a last_updated_on timestamp, odd ids
/// leave it NULL.
pub async fn seeded_pool(dir: &Path, count: i64) -> SqlitePool {
    let db_path = dir.join("cats.db");
    let pool = create_pool(db_path.to_str().unwrap()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let created = Utc::now().to_rfc3339();
    for i in 1..=count {
        let last_updated = if i % 2 == 0 { Some(created.clone()) } else { None };
        sqlx::query(
            "INSERT INTO cats (name, weight, created_on, last_updated_on) VALUES (?, ?, ?, ?)",
        )
        .bind(format!("cat-{}", i))
        .bind(6 + (i % 10) as i32)
        .bind(&created)
        .bind(last_updated)
        .execute(&pool)
        .await
        .unwrap();
    }

    pool
}

/// Bind a server on an OS-assigned loopback port and serve until shutdown
pub async fn spawn_server(
    repo: Arc<dyn CatRepository>,
    tls: Arc<rustls::ServerConfig>,
) -> (
    SocketAddr,
    ShutdownSender,
    tokio::task::JoinHandle<std::io::Result<()>>,
) {
    let mut registry = MethodRegistry::new();
    registry.register(Arc::new(CatsHandler::new(repo, Duration::from_secs(10))));

    let config = RpcServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
    };
    let server = RpcServer::bind(config, tls, registry).await.unwrap();
    let addr = server.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let handle = tokio::spawn(server.serve(shutdown_rx));

    (addr, shutdown_tx, handle)
}

//! Cattery Daemon - Main Entry Point
//! Mutually-authenticated RPC service over the cat store

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use cattery_api_rpc::handler::CatsHandler;
use cattery_api_rpc::server::RpcServerConfig;
use cattery_api_rpc::transport::{load_trust_bundle, server_tls_config};
use cattery_api_rpc::{shutdown_channel, MethodRegistry, PemFileCredentials, RpcServer};
use cattery_core::port::CatRepository;
use cattery_infra_sqlite::{create_pool, run_migrations, SqliteCatRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.cattery/cats.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:1234";
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 10_000;
const STORAGE_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("Missing {} environment variable", name))
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("CATTERY_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("cattery=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Cattery daemon v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("CATTERY_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let bind_addr =
        std::env::var("CATTERY_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let query_timeout_ms: u64 = std::env::var("CATTERY_QUERY_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_QUERY_TIMEOUT_MS);

    let ca_bundle = require_env("CATTERY_CA_BUNDLE")?;
    let server_cert = require_env("CATTERY_SERVER_CERT")?;
    let server_key = require_env("CATTERY_SERVER_KEY")?;

    info!(db_path = %db_path, "Opening the cat store...");

    // 3. Open the cat store
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Wire dependencies
    let cat_repo: Arc<dyn CatRepository> = Arc::new(SqliteCatRepository::new(pool));

    // 5. Probe storage before accepting connections
    tokio::time::timeout(STORAGE_PROBE_TIMEOUT, cat_repo.ping())
        .await
        .context("storage probe timed out")?
        .map_err(|e| anyhow::anyhow!("storage probe failed: {}", e))?;
    info!("Pinged the database successfully");

    // 6. Build the TLS acceptor configuration
    let trusted_issuers = load_trust_bundle(&ca_bundle)
        .map_err(|e| anyhow::anyhow!("failed to load client ca certs: {}", e))?;
    let credentials = Arc::new(PemFileCredentials::new(&server_cert, &server_key));
    let tls = server_tls_config(trusted_issuers, credentials)
        .map_err(|e| anyhow::anyhow!("TLS configuration failed: {}", e))?;

    // 7. Register handlers and bind the RPC server
    let mut registry = MethodRegistry::new();
    registry.register(Arc::new(CatsHandler::new(
        cat_repo,
        Duration::from_millis(query_timeout_ms),
    )));

    let config = RpcServerConfig {
        bind_addr: bind_addr.clone(),
    };
    let server = RpcServer::bind(config, tls, registry)
        .await
        .with_context(|| format!("failed to listen on the given address: {}", bind_addr))?;

    info!("RPC server listening at {}", bind_addr);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let mut server_handle = tokio::spawn(server.serve(shutdown_rx));

    info!("System ready. Press Ctrl+C to shutdown");

    // 8. Wait for shutdown signal or server failure
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully...");
            shutdown_tx.shutdown();
            let _ = tokio::time::timeout(Duration::from_secs(5), &mut server_handle).await;
        }
        result = &mut server_handle => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => anyhow::bail!("RPC server failed: {}", e),
                Err(e) => anyhow::bail!("RPC server task panicked: {}", e),
            }
        }
    }

    info!("Shutdown complete.");

    Ok(())
}

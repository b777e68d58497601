//! Cattery SDK - Rust Client Library
//!
//! Provides a convenient client for interacting with the Cattery daemon over
//! mutual TLS.
//!
//! # Example
//!
//! ```no_run
//! use cattery_sdk::{CatteryClient, TlsOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to daemon (both sides present certificates)
//!     let tls = TlsOptions {
//!         trust_bundle: "certs/minica.pem".into(),
//!         cert: "certs/client/cert.pem".into(),
//!         key: "certs/client/key.pem".into(),
//!     };
//!     let client = CatteryClient::connect("localhost:1234", &tls).await?;
//!
//!     // Fetch the first page of cats
//!     let cats = client.list_cats(0, 10).await?;
//!     for cat in &cats {
//!         println!("{} ({} lbs)", cat.name, cat.weight);
//!     }
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{CatteryClient, TlsOptions};
pub use error::{Result, SdkError};
pub use types::{Cat, CatId, ListCatsRequest, ListCatsResponse};

// Re-exported so callers of `connect_with` need no direct rustls dependency.
pub use cattery_api_rpc::{CredentialProvider, StaticCredentials, TlsIdentity};
pub use rustls::RootCertStore;

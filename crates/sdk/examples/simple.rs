//! Simple SDK Example
//!
//! Demonstrates basic usage of the Cattery SDK.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package cattery-daemon
//!    ```
//!
//! 2. Run this example (certificate paths are read from the environment,
//!    with defaults under `certs/`):
//!    ```bash
//!    cargo run --example simple
//!    ```

use cattery_sdk::{CatteryClient, TlsOptions};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Cattery SDK - Simple Example");
    println!("============================\n");

    let addr = env_or("CATTERY_ADDR", "localhost:1234");
    let tls = TlsOptions {
        trust_bundle: env_or("CATTERY_CA_BUNDLE", "certs/minica.pem").into(),
        cert: env_or("CATTERY_CLIENT_CERT", "certs/client/cert.pem").into(),
        key: env_or("CATTERY_CLIENT_KEY", "certs/client/key.pem").into(),
    };

    // 1. Connect with mutual TLS
    println!("1. Connecting to {}...", addr);
    let client = CatteryClient::connect(&addr, &tls).await?;
    println!("   ✓ Connected\n");

    // 2. Fetch the first page of cats
    println!("2. Fetching up to 10 cats...");
    let cats = client.list_cats(0, 10).await?;
    println!("   ✓ {} cats retrieved:", cats.len());
    for cat in &cats {
        println!("     - {} ({} lbs)", cat.name, cat.weight);
    }
    println!();

    // 3. Poll for cats added after the highest id seen so far
    let cursor = cats.first().map(|c| c.id).unwrap_or(0);
    println!("3. Checking for cats newer than id {}...", cursor);
    let newer = client.list_cats(cursor, 10).await?;
    if newer.is_empty() {
        println!("   ✓ No new cats\n");
    } else {
        println!("   ✓ {} new cats\n", newer.len());
    }

    // 4. Close the connection
    println!("4. Closing connection...");
    client.close().await?;
    println!("   ✓ Done");

    Ok(())
}

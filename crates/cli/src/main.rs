//! Cattery CLI - Command-line interface for the Cattery daemon

use anyhow::{Context, Result};
use cattery_sdk::{Cat, CatteryClient, TlsOptions};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tabled::{Table, Tabled};

const DEFAULT_ADDR: &str = "localhost:1234";

#[derive(Parser)]
#[command(name = "cattery")]
#[command(about = "Cattery CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Daemon address as host:port
    #[arg(long, env = "CATTERY_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// CA bundle the daemon certificate must chain to
    #[arg(long, env = "CATTERY_CA_BUNDLE")]
    ca_bundle: PathBuf,

    /// Client certificate presented to the daemon
    #[arg(long, env = "CATTERY_CLIENT_CERT")]
    cert: PathBuf,

    /// Private key for the client certificate
    #[arg(long, env = "CATTERY_CLIENT_KEY")]
    key: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List cats, newest id first
    List {
        /// Exclusive lower bound on cat ids (0 = from the start)
        #[arg(short, long, default_value = "0")]
        cursor: i64,

        /// Maximum number of cats to fetch
        #[arg(short, long, default_value = "10")]
        limit: i64,

        /// Print names only, one per line
        #[arg(long)]
        names: bool,
    },
}

#[derive(Tabled)]
struct CatRow {
    id: i64,
    name: String,
    weight: i32,
    created_on: String,
    last_updated_on: String,
}

impl From<Cat> for CatRow {
    fn from(cat: Cat) -> Self {
        Self {
            id: cat.id,
            name: cat.name,
            weight: cat.weight,
            created_on: cat.created_on,
            last_updated_on: cat.last_updated_on.unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let tls = TlsOptions {
        trust_bundle: cli.ca_bundle,
        cert: cli.cert,
        key: cli.key,
    };

    match cli.command {
        Commands::List {
            cursor,
            limit,
            names,
        } => {
            let client = CatteryClient::connect(&cli.addr, &tls)
                .await
                .context("Failed to connect to daemon")?;

            let cats = client.list_cats(cursor, limit).await?;

            if names {
                for cat in &cats {
                    println!("{}", cat.name);
                }
            } else if cats.is_empty() {
                println!("{}", "No cats found".yellow());
            } else {
                println!("{}", format!("✓ {} cats", cats.len()).green().bold());
                println!();

                let rows: Vec<CatRow> = cats.into_iter().map(CatRow::from).collect();
                let table = Table::new(rows).to_string();
                println!("{}", table);
            }

            client.close().await.ok();
        }
    }

    Ok(())
}

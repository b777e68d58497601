// SQLite Connection Pool Setup

use cattery_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 10;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the cat store at `database_url`, creating the database file and
/// any missing parent directories on first use. WAL mode keeps readers
/// unblocked while rows are inserted.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    if let Some(parent) = database_file(database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Query(format!(
                    "Failed to create database directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Query(format!("Invalid database URL '{}': {}", database_url, e)))?
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .map_err(|e| AppError::Query(format!("Pool creation failed: {}", e)))
}

/// Filesystem path named by `database_url`, if it is file-backed
fn database_file(database_url: &str) -> Option<&Path> {
    let raw = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    if raw.starts_with(':') || raw.contains("mode=memory") {
        return None;
    }
    Some(Path::new(raw))
}

// Migration Runner

use cattery_core::error::{AppError, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Every migration in apply order: version, label, script
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "Initial schema",
    include_str!("../migrations/001_initial_schema.sql"),
)];

/// Bring the database schema up to the latest version.
///
/// Applied versions are tracked in `schema_version`; each pending
/// migration runs inside its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current = current_version(pool).await?;
    info!("Current schema version: {}", current);

    for (version, label, sql) in MIGRATIONS {
        if *version > current {
            info!("Applying migration {:03}: {}", version, label);
            apply_migration(pool, sql).await?;
        }
    }

    info!("All migrations applied successfully");
    Ok(())
}

/// Highest applied version, 0 for a fresh database
async fn current_version(pool: &SqlitePool) -> Result<i64> {
    let table_exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::Query(format!("Schema version lookup failed: {}", e)))?;

    if table_exists == 0 {
        return Ok(0);
    }

    sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::Query(format!("Schema version lookup failed: {}", e)))
}

/// Run one migration script inside a transaction.
///
/// sqlx executes one statement per query, so the script is split on
/// semicolons after stripping comment lines.
async fn apply_migration(pool: &SqlitePool, sql: &str) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::Query(format!("Migration transaction failed: {}", e)))?;

    let body: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    for statement in body.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Query(format!("Migration statement failed: {}", e)))?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::Query(format!("Migration commit failed: {}", e)))?;
    Ok(())
}

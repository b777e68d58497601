// SQLite CatRepository Implementation

use async_trait::async_trait;
use cattery_core::domain::{Cat, CatId};
use cattery_core::error::{AppError, Result};
use cattery_core::port::CatRepository;
use sqlx::SqlitePool;

/// Map sqlx failures onto AppError, keeping the SQLite result code
/// (https://www.sqlite.org/rescode.html) visible in the message
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        let detail = match db_err.code().as_deref() {
            Some("5") => format!("Database is locked (SQLITE_BUSY): {}", db_err.message()),
            Some("13") => format!("Database or disk is full (SQLITE_FULL): {}", db_err.message()),
            Some(code) => format!("Database error [{}]: {}", code, db_err.message()),
            None => format!("Database error: {}", db_err.message()),
        };
        return AppError::Query(detail);
    }

    AppError::Query(format!("Query failed: {}", err))
}

pub struct SqliteCatRepository {
    pool: SqlitePool,
}

impl SqliteCatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatRepository for SqliteCatRepository {
    async fn list_after(&self, cursor: CatId, limit: i64) -> Result<Vec<Cat>> {
        let rows = sqlx::query_as::<_, CatRow>(
            "SELECT id, name, weight, created_on, last_updated_on \
             FROM cats WHERE id > ? ORDER BY id DESC LIMIT ?",
        )
        .bind(cursor)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_cat()).collect())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

/// Database row for the cats table
#[derive(Debug, sqlx::FromRow)]
struct CatRow {
    id: i64,
    name: String,
    weight: i32,
    created_on: String,
    last_updated_on: Option<String>,
}

impl CatRow {
    fn into_cat(self) -> Cat {
        Cat {
            id: self.id,
            name: self.name,
            weight: self.weight,
            created_on: self.created_on,
            last_updated_on: self.last_updated_on,
        }
    }
}

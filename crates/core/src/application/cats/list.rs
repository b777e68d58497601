// List Cats Use Case

use crate::domain::{Cat, CatId};
use crate::error::{AppError, Result};
use crate::port::CatRepository;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on rows served per call. Oversized limits are clamped to
/// this value, not rejected.
pub const MAX_LIMIT: i64 = 500;

/// One page of cats: `cursor` is an exclusive lower bound on the record id,
/// `limit` caps the page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCatsQuery {
    pub cursor: CatId,
    pub limit: i64,
}

/// Execute the list use case
///
/// # Arguments
///
/// * `repo` - Cat repository
/// * `query` - Page parameters (validated here)
pub async fn execute(repo: &dyn CatRepository, query: ListCatsQuery) -> Result<Vec<Cat>> {
    if query.cursor < 0 {
        return Err(AppError::Validation(format!(
            "cursor must be >= 0, got {}",
            query.cursor
        )));
    }
    if query.limit <= 0 {
        return Err(AppError::Validation(format!(
            "limit must be > 0, got {}",
            query.limit
        )));
    }

    let limit = if query.limit > MAX_LIMIT {
        debug!(requested = query.limit, capped = MAX_LIMIT, "limit clamped");
        MAX_LIMIT
    } else {
        query.limit
    };

    // Storage order is the contract order: pass results through untouched
    repo.list_after(query.cursor, limit).await
}

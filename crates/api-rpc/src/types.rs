//! RPC Request/Response Types
//!
//! Wire shapes for the cats handler. Field names are camelCase on the wire.

use cattery_core::domain::Cat;
use serde::{Deserialize, Serialize};

/// Fully-qualified method name for the cats listing call
pub const LIST_CATS_METHOD: &str = "cats.list.v1";

/// cats.list.v1 - Fetch one page of cats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCatsRequest {
    /// Exclusive lower bound on the record id
    #[serde(default)]
    pub cursor: i64,

    /// Maximum number of records in the page
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCatsResponse {
    pub cats: Vec<Cat>,
}

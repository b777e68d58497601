// Cat Domain Model

use serde::{Deserialize, Serialize};

/// Record identifier (assigned by storage, strictly increasing)
pub type CatId = i64;

/// A single cat record as served to clients.
///
/// Timestamps are opaque strings: the service carries whatever storage
/// returned without interpreting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    pub id: CatId,
    pub name: String,
    pub weight: i32,
    pub created_on: String,
    /// Absent on the wire when storage holds no value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_on: Option<String>,
}

// Cat Repository Port (Interface)

use crate::domain::{Cat, CatId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for cat retrieval
#[async_trait]
pub trait CatRepository: Send + Sync {
    /// Fetch up to `limit` cats with `id > cursor`, ordered by id descending.
    ///
    /// The ordering comes from storage and must be preserved by callers.
    async fn list_after(&self, cursor: CatId, limit: i64) -> Result<Vec<Cat>>;

    /// Cheap reachability probe against the backing store
    async fn ping(&self) -> Result<()>;
}

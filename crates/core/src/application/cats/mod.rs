// Cats Service - paginated retrieval use cases

pub mod list;

pub use list::{ListCatsQuery, MAX_LIMIT};

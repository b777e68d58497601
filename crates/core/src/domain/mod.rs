// Domain Layer - Pure business logic and entities

pub mod cat;

// Re-exports
pub use cat::{Cat, CatId};

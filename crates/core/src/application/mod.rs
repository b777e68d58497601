// Application Layer - Use Cases and Business Logic

pub mod cats;

// Re-exports
pub use cats::{ListCatsQuery, MAX_LIMIT};

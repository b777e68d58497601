// Port Layer - Interfaces for external dependencies

pub mod cat_repository;

// Re-exports
pub use cat_repository::CatRepository;

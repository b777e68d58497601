// Cattery Infrastructure - SQLite Adapter
// Implements: CatRepository

mod cat_repository;
mod connection;
mod migration;

pub use cat_repository::SqliteCatRepository;
pub use connection::create_pool;
pub use migration::run_migrations;

// sqlx::Error stays inside this crate. Adapters map it to AppError by hand
// because core cannot carry a From<sqlx::Error> impl without depending on sqlx.

// Cattery Core
// Domain model, ports, and use cases. Keeps zero infrastructure
// dependencies so adapters stay swappable.

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

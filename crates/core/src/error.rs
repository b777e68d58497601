// Application Error Type

use thiserror::Error;

/// Every failure the application layer can report.
///
/// `Validation` rejects caller input, `Query` covers the storage adapter,
/// `Internal` is everything that should not happen. The `Display` text is
/// what remote callers see, so messages carry the offending value.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

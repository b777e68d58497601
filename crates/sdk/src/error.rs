//! SDK Error Types

use cattery_api_rpc::{CallError, HandshakeError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SdkError>;

/// Everything a `CatteryClient` call can fail with
#[derive(Debug, Error)]
pub enum SdkError {
    /// Dialing or the mutual-TLS handshake failed
    #[error("Connection error: {0}")]
    Connection(#[from] HandshakeError),

    /// A call on an established connection failed
    #[error("Call error: {0}")]
    Call(#[from] CallError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

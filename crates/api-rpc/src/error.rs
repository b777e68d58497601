//! RPC Error Types
//!
//! Four failure scopes: connection establishment (`HandshakeError`), an
//! established connection (`FramingError`), a single dispatched call
//! (`RpcError`, returned in-band), and a single client call (`CallError`).

use cattery_core::error::AppError;
use thiserror::Error;

/// TLS connection establishment failure, scoped to one connection attempt
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("credential error: {0}")]
    Credential(String),

    #[error("trust bundle error: {0}")]
    TrustBundle(String),

    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wire-level failure, fatal to the connection it occurred on
#[derive(Debug, Error)]
pub enum FramingError {
    /// Clean close between frames
    #[error("connection closed by peer")]
    Closed,

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    Oversize { len: usize, max: usize },

    #[error("malformed envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Call-scoped failure reported to the remote caller in-band.
///
/// The connection stays usable after any of these.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("invalid request payload: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    App(#[from] AppError),
}

/// Client-side failure of a single call
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Framing(#[from] FramingError),

    /// The server reported a call-scoped error
    #[error("remote error: {0}")]
    Remote(String),
}

//! RPC API Layer
//!
//! Mutually-authenticated RPC for Cattery: TLS transport with per-handshake
//! credential resolution, length-prefixed JSON framing, and a single-method
//! handler surface.

pub mod client;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod server;
pub mod shutdown;
pub mod transport;
pub mod types;
pub mod wire;

pub use client::RpcChannel;
pub use credentials::{CredentialProvider, PemFileCredentials, StaticCredentials, TlsIdentity};
pub use error::{CallError, FramingError, HandshakeError, RpcError};
pub use server::{MethodRegistry, RpcServer, RpcServerConfig, RpcService};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

//! RPC Server
//!
//! TCP accept loop with mutual-TLS handshakes and a per-connection serve
//! loop. Calls dispatch through a `MethodRegistry` keyed by handler name;
//! method names are `"<handler>.<method>"`.

use crate::error::{FramingError, RpcError};
use crate::shutdown::ShutdownToken;
use crate::wire::{self, RequestEnvelope, ResponseEnvelope};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:1234";

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub bind_addr: String,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// A named group of RPC methods
#[async_trait]
pub trait RpcService: Send + Sync {
    /// Name the service is registered under (the segment before the first dot)
    fn name(&self) -> &'static str;

    /// Invoke `method` (the remainder after the service name) with the
    /// request payload
    async fn call(
        &self,
        method: &str,
        request: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError>;
}

/// Maps handler names to services and dispatches fully-qualified methods
#[derive(Default)]
pub struct MethodRegistry {
    services: HashMap<String, Arc<dyn RpcService>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, service: Arc<dyn RpcService>) {
        self.services.insert(service.name().to_string(), service);
    }

    pub async fn dispatch(
        &self,
        method: &str,
        request: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let (service_name, method_name) = method
            .split_once('.')
            .ok_or_else(|| RpcError::UnknownMethod(method.to_string()))?;

        let service = self
            .services
            .get(service_name)
            .ok_or_else(|| RpcError::UnknownMethod(method.to_string()))?;

        service.call(method_name, request).await
    }
}

/// RPC Server
pub struct RpcServer {
    listener: TcpListener,
    acceptor: TlsAcceptor,
    registry: Arc<MethodRegistry>,
}

impl RpcServer {
    /// Bind the listen address.
    ///
    /// Binding is eager so that startup failures (address in use, bad
    /// address) surface before serving begins. Port 0 is honored;
    /// `local_addr` reports the actual port.
    pub async fn bind(
        config: RpcServerConfig,
        tls: Arc<rustls::ServerConfig>,
        registry: MethodRegistry,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(&config.bind_addr).await?;

        Ok(Self {
            listener,
            acceptor: TlsAcceptor::from(tls),
            registry: Arc::new(registry),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until shutdown is signaled or the listener fails.
    ///
    /// Each connection runs on its own task: TLS handshake first, then the
    /// serve loop. Handshake and per-connection failures never stop the
    /// accept loop; listener errors other than peer-caused resets do.
    pub async fn serve(self, mut shutdown: ShutdownToken) -> std::io::Result<()> {
        loop {
            tokio::select! {
                _ = shutdown.wait() => {
                    info!("RPC server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((tcp, peer)) => {
                            let acceptor = self.acceptor.clone();
                            let registry = Arc::clone(&self.registry);

                            tokio::spawn(async move {
                                let stream = match acceptor.accept(tcp).await {
                                    Ok(stream) => stream,
                                    Err(e) => {
                                        warn!(peer = %peer, error = %e, "TLS handshake failed");
                                        return;
                                    }
                                };

                                debug!(peer = %peer, "connection established");
                                match serve_connection(stream, registry).await {
                                    Ok(()) => debug!(peer = %peer, "connection closed"),
                                    Err(e) => {
                                        warn!(peer = %peer, error = %e, "connection terminated")
                                    }
                                }
                            });
                        }
                        Err(e) if is_connection_error(&e) => {
                            warn!(error = %e, "failed to accept a connection");
                        }
                        Err(e) => {
                            error!(error = %e, "listener failed");
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}

/// Peer-caused accept failures that the loop should survive
fn is_connection_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::ConnectionReset
    )
}

/// Serve one established connection: one request envelope in, one response
/// envelope out, until the peer closes or framing corruption occurs.
///
/// Call-scoped errors go back in-band and keep the connection alive;
/// an undecodable envelope tears the connection down without a reply.
async fn serve_connection<S>(
    mut stream: S,
    registry: Arc<MethodRegistry>,
) -> Result<(), FramingError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let payload = match wire::receive_message(&mut stream).await {
            Ok(payload) => payload,
            Err(FramingError::Closed) => return Ok(()),
            Err(e) => return Err(e),
        };

        let envelope: RequestEnvelope = serde_json::from_slice(&payload)?;

        debug!(method = %envelope.method, "dispatching call");
        let reply = match registry.dispatch(&envelope.method, envelope.request).await {
            Ok(value) => ResponseEnvelope::Response(value),
            Err(e) => {
                warn!(method = %envelope.method, error = %e, "call failed");
                ResponseEnvelope::Error(e.to_string())
            }
        };

        let encoded = serde_json::to_vec(&reply)?;
        wire::send_message(&mut stream, &encoded).await?;
    }
}

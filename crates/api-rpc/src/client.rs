//! RPC Client Channel
//!
//! One mutually-authenticated connection carrying strictly sequential
//! calls: one request envelope out, one response envelope back.

use crate::error::{CallError, FramingError, HandshakeError};
use crate::wire::{self, RequestEnvelope, ResponseEnvelope};
use rustls::pki_types::ServerName;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

/// A single client connection to an RPC server
#[derive(Debug)]
pub struct RpcChannel {
    stream: TlsStream<TcpStream>,
}

impl RpcChannel {
    /// Dial `addr` (`host:port`) and complete the mutual-TLS handshake.
    ///
    /// The TLS server name is derived from the host part; bracketed IPv6
    /// literals are accepted.
    pub async fn connect(
        addr: &str,
        tls: Arc<rustls::ClientConfig>,
    ) -> Result<Self, HandshakeError> {
        let (host, _port) = addr.rsplit_once(':').ok_or_else(|| {
            HandshakeError::Connection(format!("invalid address '{}': expected host:port", addr))
        })?;
        let host = host.trim_start_matches('[').trim_end_matches(']');

        let server_name = ServerName::try_from(host.to_string()).map_err(|e| {
            HandshakeError::Connection(format!("invalid server name '{}': {}", host, e))
        })?;

        let tcp = TcpStream::connect(addr).await.map_err(|e| {
            HandshakeError::Connection(format!("failed to connect to {}: {}", addr, e))
        })?;

        let connector = TlsConnector::from(tls);
        let stream = connector.connect(server_name, tcp).await.map_err(|e| {
            HandshakeError::Connection(format!("TLS handshake with {} failed: {}", addr, e))
        })?;

        Ok(Self { stream })
    }

    /// Issue one call and wait for its response envelope
    pub async fn call<Req, Resp>(&mut self, method: &str, request: &Req) -> Result<Resp, CallError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let envelope = RequestEnvelope {
            method: method.to_string(),
            request: serde_json::to_value(request).map_err(FramingError::from)?,
        };
        let encoded = serde_json::to_vec(&envelope).map_err(FramingError::from)?;

        wire::send_message(&mut self.stream, &encoded).await?;
        let payload = wire::receive_message(&mut self.stream).await?;

        let reply: ResponseEnvelope =
            serde_json::from_slice(&payload).map_err(FramingError::from)?;
        match reply {
            ResponseEnvelope::Response(value) => {
                Ok(serde_json::from_value(value).map_err(FramingError::from)?)
            }
            ResponseEnvelope::Error(message) => Err(CallError::Remote(message)),
        }
    }

    /// Close the connection, sending the TLS close_notify
    pub async fn close(mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }
}

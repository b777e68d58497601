//! Wire Protocol
//!
//! One JSON request envelope maps to exactly one JSON response envelope per
//! call. Frames are a 4-byte big-endian length prefix followed by the
//! payload bytes.

use crate::error::FramingError;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum frame size (16 MB)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Request envelope: fully-qualified method name plus the method payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub method: String,
    pub request: serde_json::Value,
}

/// Response envelope: either a result or a call-scoped error message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseEnvelope {
    Response(serde_json::Value),
    Error(String),
}

/// Write one length-prefixed frame
pub async fn send_message<W>(stream: &mut W, payload: &[u8]) -> Result<(), FramingError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(FramingError::Oversize {
            len: payload.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }

    let len = payload.len() as u32;
    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(payload).await?;
    stream.flush().await?;

    Ok(())
}

/// Read one length-prefixed frame.
///
/// EOF before the length prefix is a clean close (`FramingError::Closed`);
/// EOF inside a frame is corruption and reported as an I/O error.
pub async fn receive_message<R>(stream: &mut R) -> Result<Vec<u8>, FramingError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    if let Err(e) = stream.read_exact(&mut len_buf).await {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Err(FramingError::Closed);
        }
        return Err(FramingError::Io(e));
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(FramingError::Oversize {
            len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).await?;

    Ok(buf)
}

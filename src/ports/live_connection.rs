//! LiveConnection port - one open persistent connection to a client.
//!
//! The session registry only sees this trait; the WebSocket adapter
//! implements it over an axum socket, tests implement it with recorders.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::ConnectionId;

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("connection is closed")]
    Closed,

    #[error("write failed: {0}")]
    Write(String),
}

/// Implementations serialize concurrent `send_text` calls so frames never
/// interleave; `is_open` may be read concurrently with a write.
#[async_trait]
pub trait LiveConnection: Send + Sync {
    fn id(&self) -> ConnectionId;

    fn is_open(&self) -> bool;

    async fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Closes the connection. Closing twice is a no-op.
    async fn close(&self);
}

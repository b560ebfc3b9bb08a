//! `LiveConnection` over the write half of an axum WebSocket.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;
use tokio::sync::Mutex;

use crate::domain::foundation::ConnectionId;
use crate::ports::{LiveConnection, TransportError};

/// One client socket. Writes are serialized through the sink mutex.
pub struct WsConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WebSocket, Message>>,
    open: AtomicBool,
}

impl WsConnection {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            id: ConnectionId::new(),
            sink: Mutex::new(sink),
            open: AtomicBool::new(true),
        }
    }

    /// Marks the connection closed after the read half ended.
    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl LiveConnection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::Closed);
        }

        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(text)).await.map_err(|e| {
            self.mark_closed();
            TransportError::Write(e.to_string())
        })
    }

    async fn close(&self) {
        if !self.open.swap(false, Ordering::SeqCst) {
            return;
        }

        let mut sink = self.sink.lock().await;
        if let Err(e) = sink.send(Message::Close(None)).await {
            tracing::debug!(connection_id = %self.id, "Close frame not sent: {}", e);
        }
        if let Err(e) = sink.close().await {
            tracing::debug!(connection_id = %self.id, "Socket close failed: {}", e);
        }
    }
}

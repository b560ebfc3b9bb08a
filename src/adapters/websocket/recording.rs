//! In-memory `LiveConnection` that keeps every frame written to it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::ConnectionId;
use crate::domain::live::LiveFrame;
use crate::ports::{LiveConnection, TransportError};

#[derive(Debug)]
pub struct RecordingConnection {
    id: ConnectionId,
    open: AtomicBool,
    failing: AtomicBool,
    closes: AtomicUsize,
    sent: Mutex<Vec<String>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self {
            id: ConnectionId::new(),
            open: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            closes: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Raw texts written so far.
    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Written texts that parse as frames.
    pub fn frames(&self) -> Vec<LiveFrame> {
        self.texts()
            .iter()
            .filter_map(|text| serde_json::from_str(text).ok())
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Makes every later write fail.
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Simulates the peer vanishing without a close handshake.
    pub fn drop_transport(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

impl Default for RecordingConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveConnection for RecordingConnection {
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
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Write("broken pipe".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text);
        Ok(())
    }

    async fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

//! Registry of authenticated live connections.
//!
//! The map is the only structure shared between connection lifecycle, the
//! heartbeat sweep and delivery. It is never locked across a network write:
//! callers clone the connection handle out and write after releasing the
//! lock. Writes to one connection are serialized by the connection itself.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ConnectionId, UserId};
use crate::domain::live::{LiveFrame, SupersedePolicy};
use crate::ports::LiveConnection;

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No session is registered for the user.
    NoSession,
    /// A session is registered but its connection reports closed.
    NotOpen,
    /// The write failed; the session was evicted.
    Failed,
}

/// Result of one heartbeat sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub pinged: usize,
    pub reaped: usize,
}

pub struct LiveSessionRegistry {
    sessions: RwLock<HashMap<UserId, Arc<dyn LiveConnection>>>,
    policy: SupersedePolicy,
}

impl LiveSessionRegistry {
    pub fn new(policy: SupersedePolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// Registers `connection` as the session of `user_id`, replacing any previous one.
    pub async fn register(&self, user_id: UserId, connection: Arc<dyn LiveConnection>) {
        let previous = self
            .sessions
            .write()
            .await
            .insert(user_id.clone(), Arc::clone(&connection));

        tracing::info!(
            user_id = %user_id,
            connection_id = %connection.id(),
            "Live session registered"
        );

        let Some(previous) = previous else {
            return;
        };
        if previous.id() == connection.id() {
            return;
        }

        match self.policy {
            SupersedePolicy::KeepOpen => {
                tracing::debug!(
                    user_id = %user_id,
                    superseded = %previous.id(),
                    "Previous session superseded"
                );
            }
            SupersedePolicy::CloseSuperseded => {
                tracing::info!(
                    user_id = %user_id,
                    superseded = %previous.id(),
                    "Closing superseded session"
                );
                previous.close().await;
            }
        }
    }

    /// Removes the session of `user_id` if it is still `connection_id`.
    ///
    /// A superseded connection closing late must not evict its replacement.
    pub async fn remove(&self, user_id: &UserId, connection_id: ConnectionId) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(user_id) {
            Some(current) if current.id() == connection_id => {
                sessions.remove(user_id);
                tracing::info!(user_id = %user_id, connection_id = %connection_id, "Live session removed");
                true
            }
            _ => false,
        }
    }

    pub async fn connection_for(&self, user_id: &UserId) -> Option<Arc<dyn LiveConnection>> {
        self.sessions.read().await.get(user_id).cloned()
    }

    pub async fn is_connected(&self, user_id: &UserId) -> bool {
        self.connection_for(user_id)
            .await
            .map(|c| c.is_open())
            .unwrap_or(false)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Sends `{"type": message_type, "content": {"data": data}}` to the user's session.
    pub async fn send_to_user(
        &self,
        user_id: &UserId,
        message_type: &str,
        data: JsonValue,
    ) -> Delivery {
        self.send_frame(user_id, &LiveFrame::new(message_type, data))
            .await
    }

    pub async fn send_frame(&self, user_id: &UserId, frame: &LiveFrame) -> Delivery {
        let Some(connection) = self.connection_for(user_id).await else {
            tracing::warn!(user_id = %user_id, "No live session for user");
            return Delivery::NoSession;
        };

        if !connection.is_open() {
            tracing::warn!(user_id = %user_id, "Live session is not open");
            return Delivery::NotOpen;
        }

        let text = match frame.to_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to serialize frame");
                return Delivery::Failed;
            }
        };

        match connection.send_text(text).await {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Write to live session failed");
                self.remove(user_id, connection.id()).await;
                Delivery::Failed
            }
        }
    }

    /// Pings every open session and drops the ones whose connection is gone.
    pub async fn sweep(&self) -> SweepReport {
        let snapshot: Vec<(UserId, Arc<dyn LiveConnection>)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(user, conn)| (user.clone(), Arc::clone(conn)))
            .collect();

        let mut report = SweepReport::default();
        let heartbeat = match LiveFrame::heartbeat().to_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize heartbeat");
                return report;
            }
        };

        for (user_id, connection) in snapshot {
            if !connection.is_open() {
                if self.remove(&user_id, connection.id()).await {
                    report.reaped += 1;
                }
                continue;
            }

            match connection.send_text(heartbeat.clone()).await {
                Ok(()) => report.pinged += 1,
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Heartbeat failed");
                    if self.remove(&user_id, connection.id()).await {
                        report.reaped += 1;
                    }
                }
            }
        }

        tracing::debug!(pinged = report.pinged, reaped = report.reaped, "Heartbeat sweep done");
        report
    }
}

impl Default for LiveSessionRegistry {
    fn default() -> Self {
        Self::new(SupersedePolicy::default())
    }
}

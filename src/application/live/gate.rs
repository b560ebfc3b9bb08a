//! Authentication gate for new live connections.
//!
//! Every connection starts an auth-timeout timer as soon as it is opened.
//! The timer is cancelled when the connection authenticates, fails
//! authentication or closes. The pending-timer map decides races: whichever
//! side removes the connection's entry first wins, so a timer that lost
//! never closes an authenticated session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::foundation::{ConnectionId, SerializableDomainEvent, UserId};
use crate::domain::live::{LiveFrame, LiveSessionOpened, SessionState, AUTHENTICATION_TIMEOUT};
use crate::ports::{EventPublisher, LiveConnection, SessionValidator};

use super::LiveSessionRegistry;

/// Per-connection view kept by the transport while the socket is open.
pub struct LiveSession {
    connection: Arc<dyn LiveConnection>,
    state: SessionState,
    user_id: Option<UserId>,
}

impl LiveSession {
    fn connecting(connection: Arc<dyn LiveConnection>) -> Self {
        Self {
            connection,
            state: SessionState::Connecting,
            user_id: None,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection.id()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    fn transition(&mut self, next: SessionState) {
        if self.state.can_transition_to(next) {
            tracing::trace!(
                connection_id = %self.connection.id(),
                from = %self.state,
                to = %next,
                "Live session state change"
            );
            self.state = next;
        }
    }
}

pub struct SessionGate {
    validator: Arc<dyn SessionValidator>,
    registry: Arc<LiveSessionRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
    auth_timeout: Duration,
    pending: Arc<Mutex<HashMap<ConnectionId, JoinHandle<()>>>>,
}

impl SessionGate {
    pub fn new(
        validator: Arc<dyn SessionValidator>,
        registry: Arc<LiveSessionRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
        auth_timeout: Duration,
    ) -> Self {
        Self {
            validator,
            registry,
            event_publisher,
            auth_timeout,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Admits a new connection, authenticating it right away when the
    /// handshake carried a credential.
    pub async fn open(
        &self,
        connection: Arc<dyn LiveConnection>,
        credential: Option<String>,
    ) -> LiveSession {
        let mut session = LiveSession::connecting(connection);
        tracing::info!(connection_id = %session.connection_id(), "Live connection opened");

        session.transition(SessionState::PendingAuth);
        self.start_auth_timer(&session.connection);

        match credential {
            Some(token) => self.authenticate(&mut session, &token).await,
            None => {
                tracing::warn!(
                    connection_id = %session.connection_id(),
                    "No credential in handshake, waiting for auth timeout"
                );
            }
        }

        session
    }

    /// Validates `token` for a session still pending authentication.
    pub async fn authenticate(&self, session: &mut LiveSession, token: &str) {
        if session.state != SessionState::PendingAuth {
            return;
        }

        match self.validator.validate(token).await {
            Ok(user) => {
                if !self.cancel_auth_timer(session.connection_id()) {
                    // The timeout fired while the credential was being checked
                    session.transition(SessionState::Closed);
                    return;
                }

                self.registry
                    .register(user.id.clone(), Arc::clone(&session.connection))
                    .await;
                session.user_id = Some(user.id.clone());
                session.transition(SessionState::Authenticated);
                tracing::info!(user_id = %user.id, "User authenticated");

                self.announce(&user.id).await;
            }
            Err(err) => {
                tracing::warn!(
                    connection_id = %session.connection_id(),
                    error = %err,
                    "Live authentication failed"
                );
                self.cancel_auth_timer(session.connection_id());
                reject(session.connection.as_ref(), err.client_message()).await;
                session.transition(SessionState::Closed);
            }
        }
    }

    /// Any client message on an authenticated session asks for a fresh snapshot.
    pub async fn on_message(&self, session: &LiveSession) {
        if let (SessionState::Authenticated, Some(user_id)) = (session.state, &session.user_id) {
            self.announce(user_id).await;
        }
    }

    /// Cleans up after the transport closed or failed.
    pub async fn on_close(&self, session: &mut LiveSession) {
        self.cancel_auth_timer(session.connection_id());

        if let Some(user_id) = &session.user_id {
            if self
                .registry
                .remove(user_id, session.connection_id())
                .await
            {
                tracing::info!(user_id = %user_id, "User disconnected");
            }
        }

        session.transition(SessionState::Closed);
        tracing::info!(connection_id = %session.connection_id(), "Live connection closed");
    }

    /// Connections still waiting to authenticate.
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn announce(&self, user_id: &UserId) {
        let envelope = match LiveSessionOpened::new(user_id.clone()).to_envelope() {
            Ok(envelope) => envelope.with_user_id(user_id.clone()),
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to build session event");
                return;
            }
        };

        if let Err(e) = self.event_publisher.publish(envelope).await {
            tracing::warn!(user_id = %user_id, error = %e, "Session catch-up failed");
        }
    }

    fn start_auth_timer(&self, connection: &Arc<dyn LiveConnection>) {
        let id = connection.id();
        let connection = Arc::clone(connection);
        let pending = Arc::clone(&self.pending);
        let timeout = self.auth_timeout;

        let mut timers = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;

            let expired = pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id)
                .is_some();
            if expired {
                tracing::warn!(connection_id = %id, "Live authentication timed out");
                reject(connection.as_ref(), AUTHENTICATION_TIMEOUT).await;
            }
        });
        timers.insert(id, handle);
    }

    fn cancel_auth_timer(&self, id: ConnectionId) -> bool {
        let handle = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        match handle {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

/// Sends an error frame and closes the connection.
async fn reject(connection: &dyn LiveConnection, message: &str) {
    match LiveFrame::error(message).to_text() {
        Ok(text) => {
            if let Err(e) = connection.send_text(text).await {
                tracing::debug!(connection_id = %connection.id(), error = %e, "Error frame not delivered");
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to serialize error frame"),
    }
    connection.close().await;
}

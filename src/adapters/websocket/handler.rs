//! WebSocket upgrade handler for live diagram updates.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Read the credential from the handshake cookie
//! 2. Upgrade to WebSocket
//! 3. Hand the connection to the session gate (authenticate or start the timeout)
//! 4. Treat every client text message as a snapshot request
//! 5. Clean up the registry entry on disconnect

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use futures::StreamExt;

use crate::application::live::SessionGate;
use crate::ports::LiveConnection;

use super::{cookie_value, WsConnection};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct LiveSocketState {
    pub gate: Arc<SessionGate>,
    pub cookie_name: Arc<str>,
}

impl LiveSocketState {
    pub fn new(gate: Arc<SessionGate>, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            gate,
            cookie_name: cookie_name.into(),
        }
    }
}

/// Route: `GET /ws/diagram`
pub async fn live_diagram_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<LiveSocketState>,
) -> Response {
    let credential = cookie_value(&headers, &state.cookie_name);
    ws.on_upgrade(move |socket| handle_socket(socket, credential, state))
}

/// Runs for the lifetime of the connection.
async fn handle_socket(socket: WebSocket, credential: Option<String>, state: LiveSocketState) {
    let (sender, mut receiver) = socket.split();
    let connection = Arc::new(WsConnection::new(sender));

    let mut session = state.gate.open(connection.clone(), credential).await;

    while connection.is_open() {
        let Some(result) = receiver.next().await else {
            break;
        };

        match result {
            Ok(Message::Text(text)) => {
                tracing::debug!(
                    connection_id = %session.connection_id(),
                    bytes = text.len(),
                    "Received client message"
                );
                state.gate.on_message(&session).await;
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!(
                    connection_id = %session.connection_id(),
                    "Received unsupported binary message"
                );
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Protocol-level keepalive, answered by axum
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(
                    connection_id = %session.connection_id(),
                    "Client sent close frame"
                );
                break;
            }
            Err(e) => {
                tracing::warn!(
                    connection_id = %session.connection_id(),
                    "Receive error: {}",
                    e
                );
                break;
            }
        }
    }

    connection.mark_closed();
    state.gate.on_close(&mut session).await;
}

/// Create axum router for the live endpoint.
pub fn live_router() -> Router<LiveSocketState> {
    Router::new().route("/ws/diagram", get(live_diagram_handler))
}

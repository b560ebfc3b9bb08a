//! WebSocket adapters for live sensor updates.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Event Bus                          │
//! └──────────────────────────────────────────────────────────┘
//!                            │ sensors.updated_for_user.v1
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                    LiveUpdateBridge                      │
//! │   - Turns per-user sensor views into "diagram" frames    │
//! └──────────────────────────────────────────────────────────┘
//!                            │ send_to_user
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                  LiveSessionRegistry                     │
//! │   user-a → WsConnection    user-b → WsConnection         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`handler`] - Axum upgrade handler for `GET /ws/diagram`
//! - [`connection`] - `LiveConnection` over a split WebSocket sink
//! - [`event_bridge`] - Bridge between the event bus and the registry
//! - [`cookies`] - Credential extraction from the handshake
//! - [`recording`] - In-memory `LiveConnection` that records frames

pub mod connection;
pub mod cookies;
pub mod event_bridge;
pub mod handler;
pub mod recording;

pub use connection::WsConnection;
pub use cookies::cookie_value;
pub use event_bridge::LiveUpdateBridge;
pub use handler::{live_diagram_handler, live_router, LiveSocketState};
pub use recording::RecordingConnection;

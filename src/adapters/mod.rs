//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT session validation and the token blacklist
//! - `events` - In-process event bus
//! - `http` - REST routes and the application router
//! - `memory` - In-memory repositories
//! - `postgres` - PostgreSQL repositories
//! - `weather` - Weather provider client
//! - `websocket` - Live sensor update sockets

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod weather;
pub mod websocket;

pub use events::InMemoryEventBus;

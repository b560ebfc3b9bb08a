//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors, events)
//! - `diagram` - Sensor/PLC graph and association reconciliation rules
//! - `place` - Place weather state, averaging and history seeding
//! - `live` - Live connection lifecycle and wire frames

pub mod diagram;
pub mod foundation;
pub mod live;
pub mod place;

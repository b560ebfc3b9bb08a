//! Live session layer.
//!
//! - `LiveSessionRegistry` - One open connection per user, with delivery and
//!   the heartbeat sweep
//! - `SessionGate` - Authentication of new connections and the auth timeout

mod gate;
mod registry;

pub use gate::{LiveSession, SessionGate};
pub use registry::{Delivery, LiveSessionRegistry, SweepReport};

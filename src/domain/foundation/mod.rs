//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the event envelope
//! that form the vocabulary of the sensor pipeline.

mod auth;
mod errors;
mod events;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, SerializableDomainEvent};
pub use ids::{ConnectionId, EventId, PlaceKey, PlcId, SensorId, UserId};
pub use timestamp::Timestamp;

//! Outbound side of the event bus.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Hands envelopes to whoever subscribed to their `event_type`.
///
/// `publish` returns only after every subscriber has run. One failing
/// subscriber does not stop the others, and its error comes back to the
/// caller.
///
/// ```ignore
/// let envelope = PlacesEnriched::new(batch_id, places).to_envelope()?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publishes in order.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

//! EventSubscriber port - Interface for subscribing to domain events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Handlers run inside the publisher's call, so they may publish further
/// events and those are delivered before the outer publish returns.
///
/// # Example
///
/// ```ignore
/// struct HistorySeeder { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for HistorySeeder {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: HistorySeriesReady = event.payload_as()?;
///         // Persist rows...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "HistorySeeder"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging and error aggregation.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
///
/// # Example
///
/// ```ignore
/// subscriber.subscribe("places.enriched.v1", aggregator);
/// subscriber.subscribe_all(&["places.refresh_requested.v1", "place.weather_requested.v1"], orchestrator);
/// ```
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to multiple event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

//! In-process event bus.
//!
//! Delivery is synchronous: `publish` awaits every subscriber of the event
//! type, in registration order, before returning. Subscribers may publish
//! further events from inside `handle`; those are delivered depth-first.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

type HandlerMap = HashMap<String, Vec<Arc<dyn EventHandler>>>;

/// Publish/subscribe bus keyed by `event_type`.
///
/// A failing subscriber is logged and the rest still run; the publisher gets
/// one error naming every subscriber that failed. Built with
/// [`InMemoryEventBus::recording`] it also keeps each envelope it saw.
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::recording());
/// bus.subscribe(PlacesEnriched::EVENT_TYPE, aggregator);
/// bus.publish(envelope).await?;
/// assert!(bus.has_event(PlacesEnriched::EVENT_TYPE));
/// ```
#[derive(Default)]
pub struct InMemoryEventBus {
    handlers: RwLock<HandlerMap>,
    log: Option<RwLock<Vec<EventEnvelope>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording() -> Self {
        Self {
            handlers: RwLock::default(),
            log: Some(RwLock::default()),
        }
    }

    /// Recorded envelopes of one type, oldest first.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.recorded(|log| {
            log.iter()
                .filter(|e| e.event_type == event_type)
                .cloned()
                .collect()
        })
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.recorded(|log| log.iter().any(|e| e.event_type == event_type))
    }

    pub fn event_count(&self) -> usize {
        self.recorded(<[EventEnvelope]>::len)
    }

    pub fn clear(&self) {
        if let Some(log) = &self.log {
            log.write().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }

    pub fn handler_count(&self, event_type: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .map_or(0, Vec::len)
    }

    fn recorded<R: Default>(&self, read: impl FnOnce(&[EventEnvelope]) -> R) -> R {
        match &self.log {
            Some(log) => read(log.read().unwrap_or_else(PoisonError::into_inner).as_slice()),
            None => R::default(),
        }
    }

    fn handlers_for(&self, event_type: &str) -> Vec<Arc<dyn EventHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if let Some(log) = &self.log {
            log.write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        }

        // The lock must not be held across handler awaits
        let handlers = self.handlers_for(&event.event_type);
        tracing::debug!(
            event_type = %event.event_type,
            event_id = %event.event_id,
            handlers = handlers.len(),
            "Dispatching event"
        );

        let mut failed = Vec::new();
        for handler in handlers {
            if let Err(e) = handler.handle(event.clone()).await {
                tracing::warn!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    error = %e,
                    "Event handler failed"
                );
                failed.push(format!("{}: {}", handler.name(), e));
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::InternalError,
                format!("{} failed: {}", event.event_type, failed.join(", ")),
            ))
        }
    }

    /// Publishes every envelope even if an earlier one failed; returns the
    /// first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        let mut first_error = None;
        for event in events {
            if let Err(e) = self.publish(event).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        self.subscribe_all(&[event_type], handler);
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        for event_type in event_types {
            handlers
                .entry((*event_type).to_string())
                .or_default()
                .push(Arc::clone(&handler));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope::new(event_type, aggregate_id, "Test", json!({}))
    }

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl EventHandler for FailingHandler {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::InternalError, "Handler failed"))
        }
        fn name(&self) -> &'static str {
            "FailingHandler"
        }
    }

    #[tokio::test]
    async fn recording_bus_stores_events() {
        let bus = InMemoryEventBus::recording();

        bus.publish(envelope("type.a.v1", "1")).await.unwrap();
        bus.publish(envelope("type.b.v1", "2")).await.unwrap();
        bus.publish(envelope("type.a.v1", "3")).await.unwrap();

        assert_eq!(bus.event_count(), 3);
        assert_eq!(bus.events_of_type("type.a.v1").len(), 2);

        bus.clear();
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn plain_bus_keeps_nothing() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("type.a.v1", "1")).await.unwrap();
        assert_eq!(bus.event_count(), 0);
        assert!(!bus.has_event("type.a.v1"));
    }

    #[tokio::test]
    async fn multiple_handlers_all_invoked() {
        let bus = InMemoryEventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe("test.event.v1", Arc::new(CountingHandler(counter.clone())));
        bus.subscribe("test.event.v1", Arc::new(CountingHandler(counter.clone())));

        bus.publish(envelope("test.event.v1", "1")).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(bus.handler_count("test.event.v1"), 2);
    }

    #[tokio::test]
    async fn subscribe_all_registers_for_multiple_types() {
        let bus = InMemoryEventBus::new();
        let received = Arc::new(AtomicUsize::new(0));

        bus.subscribe_all(
            &["type.a.v1", "type.b.v1"],
            Arc::new(CountingHandler(received.clone())),
        );

        bus.publish(envelope("type.a.v1", "1")).await.unwrap();
        bus.publish(envelope("type.b.v1", "2")).await.unwrap();
        bus.publish(envelope("type.c.v1", "3")).await.unwrap();

        assert_eq!(received.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failing_handler_does_not_stop_the_others() {
        let bus = InMemoryEventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe("test.event.v1", Arc::new(FailingHandler));
        bus.subscribe("test.event.v1", Arc::new(CountingHandler(counter.clone())));

        let result = bus.publish(envelope("test.event.v1", "1")).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        let err = result.unwrap_err();
        assert!(err.message.contains("FailingHandler"));
    }

    #[tokio::test]
    async fn publish_all_delivers_after_a_failure() {
        let bus = InMemoryEventBus::recording();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.subscribe("first.v1", Arc::new(FailingHandler));
        bus.subscribe("second.v1", Arc::new(CountingHandler(counter.clone())));

        let result = bus
            .publish_all(vec![envelope("first.v1", "1"), envelope("second.v1", "2")])
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(bus.event_count(), 2);
    }

    #[tokio::test]
    async fn nested_publish_completes_before_outer_returns() {
        struct Relay {
            bus: Arc<InMemoryEventBus>,
        }

        #[async_trait]
        impl EventHandler for Relay {
            async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
                self.bus.publish(envelope("second.v1", "x")).await
            }
            fn name(&self) -> &'static str {
                "Relay"
            }
        }

        struct Recorder(Arc<Mutex<Vec<String>>>);

        #[async_trait]
        impl EventHandler for Recorder {
            async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
                self.0.lock().unwrap().push(event.event_type);
                Ok(())
            }
            fn name(&self) -> &'static str {
                "Recorder"
            }
        }

        let bus = Arc::new(InMemoryEventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe("first.v1", Arc::new(Relay { bus: bus.clone() }));
        bus.subscribe("second.v1", Arc::new(Recorder(seen.clone())));

        bus.publish(envelope("first.v1", "x")).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["second.v1".to_string()]);
    }
}

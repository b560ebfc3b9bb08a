//! Event bridge connecting per-user sensor updates to live clients.
//!
//! Subscribes to `sensors.updated_for_user.v1` and pushes the readings to
//! the user's live session as a `"diagram"` frame. Users without an open
//! session are skipped; there is no replay.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::live::{Delivery, LiveSessionRegistry};
use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::domain::live::{SensorsUpdatedForUser, DIAGRAM_FRAME};
use crate::ports::{EventHandler, EventSubscriber};

pub struct LiveUpdateBridge {
    registry: Arc<LiveSessionRegistry>,
}

impl LiveUpdateBridge {
    pub fn new(registry: Arc<LiveSessionRegistry>) -> Self {
        Self { registry }
    }

    /// Create as an Arc (for sharing with event subscriber).
    pub fn new_shared(registry: Arc<LiveSessionRegistry>) -> Arc<Self> {
        Arc::new(Self::new(registry))
    }

    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe(SensorsUpdatedForUser::EVENT_TYPE, self.clone());
    }
}

#[async_trait]
impl EventHandler for LiveUpdateBridge {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let update: SensorsUpdatedForUser = event.payload_as()?;
        let data = serde_json::to_value(&update.readings)?;

        let outcome = self
            .registry
            .send_to_user(&update.user_id, DIAGRAM_FRAME, data)
            .await;

        if outcome == Delivery::Delivered {
            tracing::debug!(
                user_id = %update.user_id,
                sensors = update.readings.len(),
                "Pushed sensor update"
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LiveUpdateBridge"
    }
}

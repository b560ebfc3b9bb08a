//! DiagramSubmittedHandler - Event handler for `diagram.submitted.v1`.
//!
//! Runs diagrams published on the bus through the same reconciliation as
//! the HTTP route.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::diagram::DiagramSubmitted;
use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, EventSubscriber};

use super::{ReconcileDiagramCommand, ReconcileDiagramHandler};

pub struct DiagramSubmittedHandler {
    reconciler: Arc<ReconcileDiagramHandler>,
}

impl DiagramSubmittedHandler {
    pub fn new(reconciler: Arc<ReconcileDiagramHandler>) -> Self {
        Self { reconciler }
    }

    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe(DiagramSubmitted::EVENT_TYPE, self.clone());
    }
}

#[async_trait]
impl EventHandler for DiagramSubmittedHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let submitted: DiagramSubmitted = event.payload_as()?;

        self.reconciler
            .handle(ReconcileDiagramCommand {
                user_id: submitted.user_id,
                diagram: submitted.diagram,
            })
            .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "DiagramSubmittedHandler"
    }
}

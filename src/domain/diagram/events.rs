//! Events emitted around diagram submissions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, Timestamp, UserId};

use super::graph::DiagramSubmission;

/// A user submitted a new version of their diagram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramSubmitted {
    pub event_id: EventId,
    pub user_id: UserId,
    pub diagram: DiagramSubmission,
    pub submitted_at: Timestamp,
}

impl DiagramSubmitted {
    pub const EVENT_TYPE: &'static str = "diagram.submitted.v1";

    pub fn new(user_id: UserId, diagram: DiagramSubmission) -> Self {
        Self {
            event_id: EventId::new(),
            user_id,
            diagram,
            submitted_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    DiagramSubmitted,
    aggregate_id = user_id,
    aggregate_type = "Diagram",
    occurred_at = submitted_at,
);

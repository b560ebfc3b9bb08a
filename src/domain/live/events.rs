//! Events exchanged between the live session layer and the rest of the pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, Timestamp, UserId};
use crate::domain::place::SensorReading;

/// An authenticated client connected or pinged and wants a fresh snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSessionOpened {
    pub event_id: EventId,
    pub user_id: UserId,
    pub opened_at: Timestamp,
}

impl LiveSessionOpened {
    pub const EVENT_TYPE: &'static str = "live_session.opened.v1";

    pub fn new(user_id: UserId) -> Self {
        Self {
            event_id: EventId::new(),
            user_id,
            opened_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    LiveSessionOpened,
    aggregate_id = user_id,
    aggregate_type = "LiveSession",
    occurred_at = opened_at,
);

/// Sensor readings that one user should see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorsUpdatedForUser {
    pub event_id: EventId,
    pub user_id: UserId,
    pub readings: Vec<SensorReading>,
    pub occurred_at: Timestamp,
}

impl SensorsUpdatedForUser {
    pub const EVENT_TYPE: &'static str = "sensors.updated_for_user.v1";

    pub fn new(user_id: UserId, readings: Vec<SensorReading>) -> Self {
        Self {
            event_id: EventId::new(),
            user_id,
            readings,
            occurred_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    SensorsUpdatedForUser,
    aggregate_id = user_id,
    aggregate_type = "LiveSession",
    occurred_at = occurred_at,
);

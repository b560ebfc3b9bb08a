//! Events of the weather refresh flow.
//!
//! ```text
//! places.refresh_requested ─┐
//! place.weather_requested ──┴─> Orchestrator ─> places.enriched ─┐
//! place.history_requested ───> Orchestrator ─> place.history_ready ┴─> Aggregator ─> places.updated
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{EventId, PlaceKey, Timestamp};

use super::{EnrichedPlace, Place};

/// Time to refresh every known place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshAllPlacesRequested {
    pub event_id: EventId,
    /// Who asked, e.g. "scheduler".
    pub trigger: String,
    pub requested_at: Timestamp,
}

impl RefreshAllPlacesRequested {
    pub const EVENT_TYPE: &'static str = "places.refresh_requested.v1";

    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            trigger: trigger.into(),
            requested_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    RefreshAllPlacesRequested,
    aggregate_id = trigger,
    aggregate_type = "Place",
    occurred_at = requested_at,
);

/// Current weather is needed for an explicit list of places.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceWeatherRequested {
    pub event_id: EventId,
    pub batch_id: Uuid,
    pub places: Vec<PlaceKey>,
    pub requested_at: Timestamp,
}

impl PlaceWeatherRequested {
    pub const EVENT_TYPE: &'static str = "place.weather_requested.v1";

    pub fn new(places: Vec<PlaceKey>) -> Self {
        Self {
            event_id: EventId::new(),
            batch_id: Uuid::new_v4(),
            places,
            requested_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    PlaceWeatherRequested,
    aggregate_id = batch_id,
    aggregate_type = "Place",
    occurred_at = requested_at,
);

/// Yesterday's hourly series is needed for a newly discovered place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceHistoryRequested {
    pub event_id: EventId,
    pub place: PlaceKey,
    pub requested_at: Timestamp,
}

impl PlaceHistoryRequested {
    pub const EVENT_TYPE: &'static str = "place.history_requested.v1";

    pub fn new(place: PlaceKey) -> Self {
        Self {
            event_id: EventId::new(),
            place,
            requested_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    PlaceHistoryRequested,
    aggregate_id = place,
    aggregate_type = "Place",
    occurred_at = requested_at,
);

/// Every place of a batch after its weather lookup, failed lookups included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesEnriched {
    pub event_id: EventId,
    pub batch_id: Uuid,
    pub places: Vec<EnrichedPlace>,
    pub occurred_at: Timestamp,
}

impl PlacesEnriched {
    pub const EVENT_TYPE: &'static str = "places.enriched.v1";

    pub fn new(batch_id: Uuid, places: Vec<EnrichedPlace>) -> Self {
        Self {
            event_id: EventId::new(),
            batch_id,
            places,
            occurred_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    PlacesEnriched,
    aggregate_id = batch_id,
    aggregate_type = "Place",
    occurred_at = occurred_at,
);

/// Hourly temperatures of a place, oldest sample first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySeriesReady {
    pub event_id: EventId,
    pub place: PlaceKey,
    pub temperatures: Vec<f64>,
    pub occurred_at: Timestamp,
}

impl HistorySeriesReady {
    pub const EVENT_TYPE: &'static str = "place.history_ready.v1";

    pub fn new(place: PlaceKey, temperatures: Vec<f64>) -> Self {
        Self {
            event_id: EventId::new(),
            place,
            temperatures,
            occurred_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    HistorySeriesReady,
    aggregate_id = place,
    aggregate_type = "Place",
    occurred_at = occurred_at,
);

/// Place state persisted by the aggregator, ready for distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesUpdated {
    pub event_id: EventId,
    pub batch_id: Uuid,
    pub places: Vec<Place>,
    pub occurred_at: Timestamp,
}

impl PlacesUpdated {
    pub const EVENT_TYPE: &'static str = "places.updated.v1";

    pub fn new(batch_id: Uuid, places: Vec<Place>) -> Self {
        Self {
            event_id: EventId::new(),
            batch_id,
            places,
            occurred_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    PlacesUpdated,
    aggregate_id = batch_id,
    aggregate_type = "Place",
    occurred_at = occurred_at,
);

//! Domain events and the envelope they travel in.
//!
//! Every event struct carries an `EVENT_TYPE` constant and an `event_id`
//! field; `domain_event!` derives the [`DomainEvent`] impl from those. The bus
//! only ever sees [`EventEnvelope`]s, routed by their `event_type` string.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::{DomainError, EventId, Timestamp, UserId};

/// Routing facts every event exposes.
pub trait DomainEvent: Send + Sync {
    /// Versioned type string, e.g. `places.enriched.v1`.
    fn event_type(&self) -> &'static str;

    fn aggregate_id(&self) -> String;

    /// `"Place"`, `"Diagram"` or `"LiveSession"`.
    fn aggregate_type(&self) -> &'static str;

    fn occurred_at(&self) -> Timestamp;

    fn event_id(&self) -> EventId;
}

/// `to_envelope()` for any serializable event.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    fn to_envelope(&self) -> Result<EventEnvelope, DomainError> {
        EventEnvelope::from_event(self)
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Implements [`DomainEvent`] for a struct with an `EVENT_TYPE` constant and
/// an `event_id: EventId` field.
///
/// ```ignore
/// crate::domain_event!(
///     HistorySeriesReady,
///     aggregate_id = place,
///     aggregate_type = "Place",
///     occurred_at = fetched_at,
/// );
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event:ident,
        aggregate_id = $aggregate_field:ident,
        aggregate_type = $aggregate_type:expr,
        occurred_at = $at_field:ident $(,)?
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event {
            fn event_type(&self) -> &'static str {
                Self::EVENT_TYPE
            }

            fn aggregate_id(&self) -> String {
                self.$aggregate_field.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                $aggregate_type
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$at_field
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.event_id
            }
        }
    };
}

/// What the bus carries: routing fields plus the event as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub event_type: String,
    /// Parsed from the `.vN` suffix of `event_type`.
    pub schema_version: u32,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,
    pub payload: Value,
    /// User whose action produced the event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl EventEnvelope {
    /// Envelope for an ad hoc payload, stamped now.
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        payload: Value,
    ) -> Self {
        let event_type = event_type.into();
        Self {
            event_id: EventId::new(),
            schema_version: schema_version(&event_type),
            event_type,
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Timestamp::now(),
            payload,
            user_id: None,
        }
    }

    pub fn from_event<T>(event: &T) -> Result<Self, DomainError>
    where
        T: DomainEvent + Serialize + ?Sized,
    {
        let event_type = event.event_type();
        Ok(Self {
            event_id: event.event_id(),
            event_type: event_type.to_string(),
            schema_version: schema_version(event_type),
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_string(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
            user_id: None,
        })
    }

    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Decodes the payload back into its event struct.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

fn schema_version(event_type: &str) -> u32 {
    event_type
        .rsplit_once(".v")
        .and_then(|(_, version)| version.parse().ok())
        .unwrap_or(1)
}

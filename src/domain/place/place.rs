//! Place state and its append-only history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlaceKey, Timestamp};

/// Weather at a place as reported by the provider.
///
/// Every field is `None` when the lookup failed; such places still travel
/// through the pipeline so their sensors show up as inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub condition: Option<String>,
    pub continent: Option<String>,
}

impl CurrentConditions {
    /// Conditions of a place whose lookup failed.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.temperature.is_none() && self.condition.is_none() && self.continent.is_none()
    }
}

/// A place after a weather lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPlace {
    pub place: PlaceKey,
    #[serde(flatten)]
    pub conditions: CurrentConditions,
}

impl EnrichedPlace {
    pub fn new(place: PlaceKey, conditions: CurrentConditions) -> Self {
        Self { place, conditions }
    }
}

/// Current and averaged weather for a named location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub key: PlaceKey,
    pub temperature: Option<f64>,
    pub average_temperature: Option<f64>,
    pub condition: Option<String>,
    pub continent: Option<String>,
    pub updated_at: Timestamp,
}

impl Place {
    /// A place referenced by a sensor before any weather is known for it.
    pub fn unobserved(key: PlaceKey) -> Self {
        Self {
            key,
            temperature: None,
            average_temperature: None,
            condition: None,
            continent: None,
            updated_at: Timestamp::now(),
        }
    }

    /// Place state after folding in a fresh lookup and the recomputed average.
    pub fn observed(enriched: &EnrichedPlace, average_temperature: Option<f64>, at: Timestamp) -> Self {
        Self {
            key: enriched.place.clone(),
            temperature: enriched.conditions.temperature,
            average_temperature,
            condition: enriched.conditions.condition.clone(),
            continent: enriched.conditions.continent.clone(),
            updated_at: at,
        }
    }
}

/// One historical sample of a place's temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceHistory {
    pub place: PlaceKey,
    pub temperature: Option<f64>,
    pub condition: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlaceHistory {
    /// A sample taken from a live lookup at `at`.
    pub fn from_lookup(enriched: &EnrichedPlace, at: Timestamp) -> Self {
        Self {
            place: enriched.place.clone(),
            temperature: enriched.conditions.temperature,
            condition: enriched.conditions.condition.clone(),
            created_at: at,
            updated_at: at,
        }
    }
}

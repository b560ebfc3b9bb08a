//! Per-sensor view of place weather, as pushed to live clients.

use serde::{Deserialize, Serialize};

use crate::domain::diagram::Sensor;
use crate::domain::foundation::{PlaceKey, SensorId};

use super::Place;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub id: SensorId,
    pub place: PlaceKey,
    pub temperature: Option<f64>,
    pub average_temperature: Option<f64>,
    pub condition: Option<String>,
}

impl SensorReading {
    /// Reading of `sensor`, empty when its place has no state yet.
    pub fn new(sensor: &Sensor, place: Option<&Place>) -> Self {
        Self {
            id: sensor.id,
            place: sensor.place.clone(),
            temperature: place.and_then(|p| p.temperature),
            average_temperature: place.and_then(|p| p.average_temperature),
            condition: place.and_then(|p| p.condition.clone()),
        }
    }

    pub fn has_temperature(&self) -> bool {
        self.temperature.is_some()
    }
}

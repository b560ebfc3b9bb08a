//! The diagram graph a user submits, and the graph the server accepts back.
//!
//! Field names follow the drawing client: PLC lists travel as `PLCs` and a
//! port connection names its controller with `PLCId`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlaceKey, PlcId, SensorId};
use crate::domain::place::SensorReading;

use super::catalog::{Plc, Sensor};

/// A connection from the enclosing sensor to a PLC port.
///
/// The PLC is referenced by its raw id text; references that do not parse or
/// do not name a PLC of the same submission are dropped during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlcPort {
    #[serde(rename = "PLCId")]
    pub plc_id: String,
    pub port: i32,
}

impl PlcPort {
    pub fn new(plc_id: impl Into<String>, port: i32) -> Self {
        Self {
            plc_id: plc_id.into(),
            port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDescriptor {
    #[serde(default)]
    pub id: Option<SensorId>,
    #[serde(default)]
    pub place: Option<PlaceKey>,
    #[serde(default)]
    pub connections: Vec<PlcPort>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlcDescriptor {
    #[serde(default)]
    pub id: Option<PlcId>,
    #[serde(default)]
    pub name: String,
}

/// Graph of sensors and PLCs as drawn by one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramSubmission {
    #[serde(default)]
    pub sensors: Vec<SensorDescriptor>,
    #[serde(rename = "PLCs", default)]
    pub plcs: Vec<PlcDescriptor>,
}

impl DiagramSubmission {
    /// Gives every descriptor an id, minting fresh ones where the client sent none.
    pub fn assign_ids(self) -> AcceptedDiagram {
        let sensors = self
            .sensors
            .into_iter()
            .map(|descriptor| AcceptedSensor {
                id: descriptor.id.unwrap_or_default(),
                place: descriptor.place.unwrap_or_else(|| PlaceKey::new("")),
                connections: descriptor.connections,
            })
            .collect();

        let plcs = self
            .plcs
            .into_iter()
            .map(|descriptor| Plc::new(descriptor.id.unwrap_or_default(), descriptor.name))
            .collect();

        AcceptedDiagram {
            sensors,
            plcs,
            readings: Vec::new(),
        }
    }
}

/// A sensor descriptor after id assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedSensor {
    pub id: SensorId,
    pub place: PlaceKey,
    pub connections: Vec<PlcPort>,
}

impl AcceptedSensor {
    pub fn to_sensor(&self) -> Sensor {
        Sensor::new(self.id, self.place.clone())
    }
}

/// The graph as stored, echoed back to the submitting client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedDiagram {
    pub sensors: Vec<AcceptedSensor>,
    #[serde(rename = "PLCs")]
    pub plcs: Vec<Plc>,
    /// Current readings of sensors whose place was already known.
    pub readings: Vec<SensorReading>,
}

impl AcceptedDiagram {
    pub fn catalog_sensors(&self) -> Vec<Sensor> {
        self.sensors.iter().map(AcceptedSensor::to_sensor).collect()
    }

    pub fn sensor_ids(&self) -> Vec<SensorId> {
        self.sensors.iter().map(|s| s.id).collect()
    }

    pub fn plc_ids(&self) -> Vec<PlcId> {
        self.plcs.iter().map(|p| p.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_client_field_names() {
        let plc = PlcId::new();
        let submission: DiagramSubmission = serde_json::from_value(json!({
            "sensors": [
                {"id": null, "place": "Graz", "connections": [{"PLCId": plc.to_string(), "port": 2}]}
            ],
            "PLCs": [{"id": plc, "name": "Boiler room"}]
        }))
        .unwrap();

        assert_eq!(submission.sensors.len(), 1);
        assert_eq!(submission.sensors[0].connections[0].port, 2);
        assert_eq!(submission.plcs[0].id, Some(plc));
        assert_eq!(submission.plcs[0].name, "Boiler room");
    }

    #[test]
    fn assign_ids_keeps_existing_and_mints_missing() {
        let known = SensorId::new();
        let submission = DiagramSubmission {
            sensors: vec![
                SensorDescriptor {
                    id: Some(known),
                    place: Some(PlaceKey::new("Oslo")),
                    connections: vec![],
                },
                SensorDescriptor {
                    id: None,
                    place: None,
                    connections: vec![],
                },
            ],
            plcs: vec![PlcDescriptor {
                id: None,
                name: "Line 4".to_string(),
            }],
        };

        let accepted = submission.assign_ids();

        assert_eq!(accepted.sensors[0].id, known);
        assert_ne!(accepted.sensors[1].id, known);
        assert!(accepted.sensors[1].place.is_blank());
        assert_eq!(accepted.plcs[0].name, "Line 4");
    }

    #[test]
    fn accepted_diagram_serializes_plcs_under_client_name() {
        let accepted = DiagramSubmission::default().assign_ids();
        let value = serde_json::to_value(&accepted).unwrap();
        assert!(value.get("PLCs").is_some());
        assert!(value.get("plcs").is_none());
    }
}

//! Set arithmetic behind diagram reconciliation.
//!
//! Stored association rows are aligned with the latest submission by
//! upserting what the submission contains and deleting whatever the owner
//! had before that the submission no longer mentions.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use crate::domain::foundation::{PlcId, UserId};

use super::catalog::{PortKey, SensorPlcConnection};
use super::graph::AcceptedDiagram;

/// Rows of `existing` whose key does not appear among the `kept` rows.
pub fn stale_rows<T, K, F>(existing: Vec<T>, kept: &[T], key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let stay: HashSet<K> = kept.iter().map(&key).collect();
    existing
        .into_iter()
        .filter(|row| !stay.contains(&key(row)))
        .collect()
}

/// Why a drawn connection could not become a wiring edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReason {
    /// The PLC reference is not a valid identifier.
    UnparseablePlcId,
    /// The PLC is not part of the same submission.
    UnknownPlc,
}

/// A connection dropped while building edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingConnection {
    pub plc_ref: String,
    pub port: i32,
    pub reason: DanglingReason,
}

/// Edges built from a submission plus the references that were dropped.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConnections {
    pub connections: Vec<SensorPlcConnection>,
    pub dangling: Vec<DanglingConnection>,
}

/// Turns the sensors' drawn port connections into wiring edges owned by `owner`.
///
/// Each `(plcId, port)` slot holds one sensor; when two sensors claim the
/// same slot the later one in submission order wins.
pub fn resolve_connections(diagram: &AcceptedDiagram, owner: &UserId) -> ResolvedConnections {
    let known_plcs: HashSet<PlcId> = diagram.plcs.iter().map(|p| p.id).collect();
    let mut slots: BTreeMap<PortKey, usize> = BTreeMap::new();
    let mut connections: Vec<SensorPlcConnection> = Vec::new();
    let mut dangling = Vec::new();

    for sensor in &diagram.sensors {
        for port in &sensor.connections {
            let plc_id = match port.plc_id.parse::<PlcId>() {
                Ok(id) => id,
                Err(_) => {
                    dangling.push(DanglingConnection {
                        plc_ref: port.plc_id.clone(),
                        port: port.port,
                        reason: DanglingReason::UnparseablePlcId,
                    });
                    continue;
                }
            };

            if !known_plcs.contains(&plc_id) {
                dangling.push(DanglingConnection {
                    plc_ref: port.plc_id.clone(),
                    port: port.port,
                    reason: DanglingReason::UnknownPlc,
                });
                continue;
            }

            let edge = SensorPlcConnection::new(sensor.id, plc_id, port.port, owner.clone());
            match slots.get(&edge.port_key()) {
                Some(&index) => connections[index] = edge,
                None => {
                    slots.insert(edge.port_key(), connections.len());
                    connections.push(edge);
                }
            }
        }
    }

    ResolvedConnections {
        connections,
        dangling,
    }
}

/// Edges of `existing` whose port slot is not occupied by any kept edge.
pub fn stale_connections(
    existing: Vec<SensorPlcConnection>,
    kept: &[SensorPlcConnection],
) -> Vec<SensorPlcConnection> {
    stale_rows(existing, kept, SensorPlcConnection::port_key)
}

/// Groups rows by an ordered key, preserving input order inside each group.
pub fn group_by<T, K, F>(rows: impl IntoIterator<Item = T>, key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

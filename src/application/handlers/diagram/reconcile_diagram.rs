//! ReconcileDiagramHandler - Command handler aligning stored associations
//! with a user's latest diagram.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::diagram::{
    resolve_connections, stale_connections, stale_rows, AcceptedDiagram, DiagramSubmission,
    UserPlc, UserSensor,
};
use crate::domain::foundation::{DomainError, PlaceKey, SerializableDomainEvent, UserId};
use crate::domain::live::SensorsUpdatedForUser;
use crate::domain::place::{Place, PlaceHistoryRequested, PlaceWeatherRequested, SensorReading};
use crate::ports::{
    EventPublisher, PlaceRepository, PlcRepository, SensorPlcRepository, SensorRepository,
    UserPlcRepository, UserSensorRepository,
};

/// Command to store a user's diagram.
#[derive(Debug, Clone)]
pub struct ReconcileDiagramCommand {
    pub user_id: UserId,
    pub diagram: DiagramSubmission,
}

/// Repositories touched by reconciliation.
#[derive(Clone)]
pub struct DiagramStores {
    pub sensors: Arc<dyn SensorRepository>,
    pub plcs: Arc<dyn PlcRepository>,
    pub user_sensors: Arc<dyn UserSensorRepository>,
    pub user_plcs: Arc<dyn UserPlcRepository>,
    pub sensor_plcs: Arc<dyn SensorPlcRepository>,
    pub places: Arc<dyn PlaceRepository>,
}

/// Handler for diagram submissions.
///
/// Every write is an upsert or a delete of rows keyed by the submission, so
/// retrying a failed submission converges to the same stored state.
pub struct ReconcileDiagramHandler {
    stores: DiagramStores,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ReconcileDiagramHandler {
    pub fn new(stores: DiagramStores, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            stores,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: ReconcileDiagramCommand) -> Result<AcceptedDiagram, DomainError> {
        let user_id = cmd.user_id;

        // 1. Assign ids
        let mut accepted = cmd.diagram.assign_ids();

        // 2. Shared catalog
        self.stores.plcs.upsert_all(&accepted.plcs).await?;
        self.stores
            .sensors
            .upsert_all(&accepted.catalog_sensors())
            .await?;

        // 3-4. User associations
        self.reconcile_user_plcs(&user_id, &accepted).await?;
        self.reconcile_user_sensors(&user_id, &accepted).await?;

        // 5. Places
        accepted.readings = self.resolve_places(&accepted).await?;

        // 6. Wiring edges
        self.reconcile_connections(&user_id, &accepted).await?;

        // 7. Push what is already known
        let known: Vec<SensorReading> = accepted
            .readings
            .iter()
            .filter(|r| r.has_temperature())
            .cloned()
            .collect();

        tracing::info!(
            user_id = %user_id,
            sensors = accepted.sensors.len(),
            plcs = accepted.plcs.len(),
            known_readings = known.len(),
            "Diagram reconciled"
        );

        let event = SensorsUpdatedForUser::new(user_id.clone(), known);
        if let Err(e) = self.event_publisher.publish(event.to_envelope()?).await {
            tracing::warn!(user_id = %user_id, error = %e, "Known readings were not delivered");
        }

        Ok(accepted)
    }

    async fn reconcile_user_plcs(
        &self,
        user_id: &UserId,
        accepted: &AcceptedDiagram,
    ) -> Result<(), DomainError> {
        let rows: Vec<UserPlc> = accepted
            .plc_ids()
            .into_iter()
            .map(|id| UserPlc::new(user_id.clone(), id))
            .collect();
        self.stores.user_plcs.upsert_all(&rows).await?;

        let existing = self.stores.user_plcs.find_by_user(user_id).await?;
        let stale = stale_rows(existing, &rows, UserPlc::key);
        if !stale.is_empty() {
            tracing::debug!(user_id = %user_id, removed = stale.len(), "Removing PLC associations");
            self.stores.user_plcs.delete_all(&stale).await?;
        }
        Ok(())
    }

    async fn reconcile_user_sensors(
        &self,
        user_id: &UserId,
        accepted: &AcceptedDiagram,
    ) -> Result<(), DomainError> {
        let rows: Vec<UserSensor> = accepted
            .sensor_ids()
            .into_iter()
            .map(|id| UserSensor::new(user_id.clone(), id))
            .collect();
        self.stores.user_sensors.upsert_all(&rows).await?;

        let existing = self.stores.user_sensors.find_by_user(user_id).await?;
        let stale = stale_rows(existing, &rows, UserSensor::key);
        if !stale.is_empty() {
            tracing::debug!(user_id = %user_id, removed = stale.len(), "Removing sensor associations");
            self.stores.user_sensors.delete_all(&stale).await?;
        }
        Ok(())
    }

    /// Creates unknown places and returns readings for sensors at known ones.
    ///
    /// Each new place gets a history request; all new places share one
    /// current-weather request. Their sensors are left out of the readings.
    async fn resolve_places(
        &self,
        accepted: &AcceptedDiagram,
    ) -> Result<Vec<SensorReading>, DomainError> {
        let keys: BTreeSet<PlaceKey> = accepted
            .sensors
            .iter()
            .map(|s| s.place.clone())
            .filter(|p| !p.is_blank())
            .collect();

        let mut created = Vec::new();
        let mut known = Vec::new();
        for key in keys {
            if self
                .stores
                .places
                .insert_if_absent(Place::unobserved(key.clone()))
                .await?
            {
                created.push(key);
            } else {
                known.push(key);
            }
        }

        let places = self.stores.places.find_many(&known).await?;
        let readings = accepted
            .sensors
            .iter()
            .filter_map(|sensor| {
                places
                    .iter()
                    .find(|p| p.key == sensor.place)
                    .map(|place| SensorReading::new(&sensor.to_sensor(), Some(place)))
            })
            .collect();

        if !created.is_empty() {
            tracing::info!(places = ?created, "Requesting weather for new places");
            let mut requests = created
                .iter()
                .map(|key| PlaceHistoryRequested::new(key.clone()).to_envelope())
                .collect::<Result<Vec<_>, _>>()?;
            requests.push(PlaceWeatherRequested::new(created.clone()).to_envelope()?);
            // Lookups fail per place; the diagram itself is already stored
            if let Err(e) = self.event_publisher.publish_all(requests).await {
                tracing::warn!(places = ?created, error = %e, "Weather for new places failed");
            }
        }

        Ok(readings)
    }

    async fn reconcile_connections(
        &self,
        user_id: &UserId,
        accepted: &AcceptedDiagram,
    ) -> Result<(), DomainError> {
        let resolved = resolve_connections(accepted, user_id);
        for dangling in &resolved.dangling {
            tracing::warn!(
                user_id = %user_id,
                plc = %dangling.plc_ref,
                port = dangling.port,
                reason = ?dangling.reason,
                "Dropping connection to PLC outside the diagram"
            );
        }

        self.stores
            .sensor_plcs
            .upsert_all(&resolved.connections)
            .await?;

        let existing = self.stores.sensor_plcs.find_by_owner(user_id).await?;
        let stale = stale_connections(existing, &resolved.connections);
        if !stale.is_empty() {
            self.stores.sensor_plcs.delete_all(&stale).await?;
        }
        Ok(())
    }
}

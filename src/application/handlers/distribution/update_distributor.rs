//! UpdateDistributor - Event handler mapping place changes to the users who
//! should see them.
//!
//! Listens for:
//! - `places.updated.v1` - fan out to every user with a sensor at the place
//! - `live_session.opened.v1` - full snapshot for one user
//!
//! Each per-user batch is published as `sensors.updated_for_user.v1`.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::diagram::{group_by, UserSensor};
use crate::domain::foundation::{
    DomainError, EventEnvelope, PlcId, SensorId, SerializableDomainEvent, UserId,
};
use crate::domain::live::{LiveSessionOpened, SensorsUpdatedForUser};
use crate::domain::place::{Place, PlacesUpdated, SensorReading};
use crate::ports::{
    EventHandler, EventPublisher, EventSubscriber, PlaceRepository, SensorPlcRepository,
    SensorRepository, UserPlcRepository, UserSensorRepository,
};

/// Read side of the sensor catalog and its associations.
#[derive(Clone)]
pub struct DistributionStores {
    pub sensors: Arc<dyn SensorRepository>,
    pub user_sensors: Arc<dyn UserSensorRepository>,
    pub user_plcs: Arc<dyn UserPlcRepository>,
    pub sensor_plcs: Arc<dyn SensorPlcRepository>,
    pub places: Arc<dyn PlaceRepository>,
}

pub struct UpdateDistributor {
    stores: DistributionStores,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateDistributor {
    pub fn new(stores: DistributionStores, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            stores,
            event_publisher,
        }
    }

    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe_all(
            &[PlacesUpdated::EVENT_TYPE, LiveSessionOpened::EVENT_TYPE],
            self.clone(),
        );
    }

    /// One batch per place and user, holding that user's sensors at the place.
    pub async fn on_places_updated(&self, places: &[Place]) -> Result<(), DomainError> {
        for place in places {
            let sensors = self.stores.sensors.find_by_place(&place.key).await?;
            if sensors.is_empty() {
                continue;
            }

            let ids: Vec<SensorId> = sensors.iter().map(|s| s.id).collect();
            let owners = self.stores.user_sensors.find_by_sensor_ids(&ids).await?;

            for (user_id, rows) in group_by(owners, |row: &UserSensor| row.user_id.clone()) {
                let readings: Vec<SensorReading> = rows
                    .iter()
                    .filter_map(|row| sensors.iter().find(|s| s.id == row.sensor_id))
                    .map(|sensor| SensorReading::new(sensor, Some(place)))
                    .collect();

                tracing::debug!(
                    user_id = %user_id,
                    place = %place.key,
                    sensors = readings.len(),
                    "Distributing place update"
                );
                self.publish(user_id, readings).await?;
            }
        }
        Ok(())
    }

    /// Sends the user every sensor tied to them, directly or through the
    /// ports of their PLCs. Nothing is sent for a user without sensors.
    pub async fn on_user_connected(&self, user_id: &UserId) -> Result<(), DomainError> {
        let mut ids: BTreeSet<SensorId> = self
            .stores
            .user_sensors
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|row| row.sensor_id)
            .collect();

        let owned_plcs: HashSet<PlcId> = self
            .stores
            .user_plcs
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|row| row.plc_id)
            .collect();
        ids.extend(
            self.stores
                .sensor_plcs
                .find_by_owner(user_id)
                .await?
                .into_iter()
                .filter(|edge| owned_plcs.contains(&edge.plc_id))
                .map(|edge| edge.sensor_id),
        );

        if ids.is_empty() {
            tracing::debug!(user_id = %user_id, "No sensors to send");
            return Ok(());
        }

        let ids: Vec<SensorId> = ids.into_iter().collect();
        let sensors = self.stores.sensors.find_by_ids(&ids).await?;
        if sensors.is_empty() {
            return Ok(());
        }

        let keys: Vec<_> = sensors
            .iter()
            .map(|s| s.place.clone())
            .filter(|p| !p.is_blank())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let places = self.stores.places.find_many(&keys).await?;

        let readings = sensors
            .iter()
            .map(|sensor| {
                let place = places.iter().find(|p| p.key == sensor.place);
                SensorReading::new(sensor, place)
            })
            .collect();

        self.publish(user_id.clone(), readings).await
    }

    async fn publish(&self, user_id: UserId, readings: Vec<SensorReading>) -> Result<(), DomainError> {
        let event = SensorsUpdatedForUser::new(user_id, readings);
        self.event_publisher.publish(event.to_envelope()?).await
    }
}

#[async_trait]
impl EventHandler for UpdateDistributor {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        match event.event_type.as_str() {
            PlacesUpdated::EVENT_TYPE => {
                let updated: PlacesUpdated = event.payload_as()?;
                self.on_places_updated(&updated.places).await
            }
            LiveSessionOpened::EVENT_TYPE => {
                let opened: LiveSessionOpened = event.payload_as()?;
                self.on_user_connected(&opened.user_id).await
            }
            other => {
                tracing::debug!(event_type = other, "Ignoring event");
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "UpdateDistributor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{
        InMemoryPlaceRepository, InMemorySensorPlcRepository, InMemorySensorRepository,
        InMemoryUserPlcRepository, InMemoryUserSensorRepository,
    };
    use crate::domain::diagram::{Sensor, SensorPlcConnection, UserPlc};
    use crate::domain::foundation::{PlaceKey, Timestamp};
    use crate::domain::place::{CurrentConditions, EnrichedPlace};

    struct Fixture {
        sensors: Arc<InMemorySensorRepository>,
        user_sensors: Arc<InMemoryUserSensorRepository>,
        user_plcs: Arc<InMemoryUserPlcRepository>,
        sensor_plcs: Arc<InMemorySensorPlcRepository>,
        places: Arc<InMemoryPlaceRepository>,
        bus: Arc<InMemoryEventBus>,
        distributor: UpdateDistributor,
    }

    fn fixture() -> Fixture {
        let sensors = Arc::new(InMemorySensorRepository::new());
        let user_sensors = Arc::new(InMemoryUserSensorRepository::new());
        let user_plcs = Arc::new(InMemoryUserPlcRepository::new());
        let sensor_plcs = Arc::new(InMemorySensorPlcRepository::new());
        let places = Arc::new(InMemoryPlaceRepository::new());
        let bus = Arc::new(InMemoryEventBus::recording());
        let stores = DistributionStores {
            sensors: sensors.clone(),
            user_sensors: user_sensors.clone(),
            user_plcs: user_plcs.clone(),
            sensor_plcs: sensor_plcs.clone(),
            places: places.clone(),
        };
        Fixture {
            distributor: UpdateDistributor::new(stores, bus.clone()),
            sensors,
            user_sensors,
            user_plcs,
            sensor_plcs,
            places,
            bus,
        }
    }

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    fn observed(place: &str, temperature: f64) -> Place {
        Place::observed(
            &EnrichedPlace::new(
                PlaceKey::new(place),
                CurrentConditions {
                    temperature: Some(temperature),
                    condition: Some("Fog".to_string()),
                    continent: Some("Europe".to_string()),
                },
            ),
            Some(temperature),
            Timestamp::now(),
        )
    }

    fn deliveries(bus: &InMemoryEventBus) -> Vec<SensorsUpdatedForUser> {
        bus.events_of_type(SensorsUpdatedForUser::EVENT_TYPE)
            .iter()
            .map(|e| e.payload_as().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn place_update_reaches_each_user_with_only_their_sensors() {
        let f = fixture();
        let (a1, a2, b1, other) = (SensorId::new(), SensorId::new(), SensorId::new(), SensorId::new());
        f.sensors
            .upsert_all(&[
                Sensor::new(a1, PlaceKey::new("Porto")),
                Sensor::new(a2, PlaceKey::new("Porto")),
                Sensor::new(b1, PlaceKey::new("Porto")),
                Sensor::new(other, PlaceKey::new("Faro")),
            ])
            .await
            .unwrap();
        f.user_sensors
            .upsert_all(&[
                UserSensor::new(user("ana"), a1),
                UserSensor::new(user("ana"), a2),
                UserSensor::new(user("ana"), other),
                UserSensor::new(user("bea"), b1),
            ])
            .await
            .unwrap();

        f.distributor
            .on_places_updated(&[observed("Porto", 17.0)])
            .await
            .unwrap();

        let sent = deliveries(&f.bus);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].user_id, user("ana"));
        let mut ana_ids: Vec<_> = sent[0].readings.iter().map(|r| r.id).collect();
        ana_ids.sort();
        let mut expected = vec![a1, a2];
        expected.sort();
        assert_eq!(ana_ids, expected);
        assert_eq!(sent[1].user_id, user("bea"));
        assert_eq!(sent[1].readings.len(), 1);
        assert_eq!(sent[1].readings[0].id, b1);
        assert_eq!(sent[1].readings[0].temperature, Some(17.0));
    }

    #[tokio::test]
    async fn place_without_sensors_sends_nothing() {
        let f = fixture();
        f.distributor
            .on_places_updated(&[observed("Empty", 1.0)])
            .await
            .unwrap();
        assert!(deliveries(&f.bus).is_empty());
    }

    #[tokio::test]
    async fn snapshot_unions_direct_and_wired_sensors() {
        let f = fixture();
        let cleo = user("cleo");
        let (direct, wired) = (SensorId::new(), SensorId::new());
        let plc = PlcId::new();
        f.sensors
            .upsert_all(&[
                Sensor::new(direct, PlaceKey::new("Gent")),
                Sensor::new(wired, PlaceKey::new("")),
            ])
            .await
            .unwrap();
        f.places.upsert_all(&[observed("Gent", 9.0)]).await.unwrap();
        f.user_sensors
            .upsert_all(&[UserSensor::new(cleo.clone(), direct)])
            .await
            .unwrap();
        f.user_plcs
            .upsert_all(&[UserPlc::new(cleo.clone(), plc)])
            .await
            .unwrap();
        f.sensor_plcs
            .upsert_all(&[SensorPlcConnection::new(wired, plc, 3, cleo.clone())])
            .await
            .unwrap();

        f.distributor.on_user_connected(&cleo).await.unwrap();

        let sent = deliveries(&f.bus);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].readings.len(), 2);
        let gent = sent[0].readings.iter().find(|r| r.id == direct).unwrap();
        assert_eq!(gent.temperature, Some(9.0));
        let unplaced = sent[0].readings.iter().find(|r| r.id == wired).unwrap();
        assert_eq!(unplaced.temperature, None);
    }

    #[tokio::test]
    async fn snapshot_for_user_without_sensors_sends_nothing() {
        let f = fixture();
        f.distributor.on_user_connected(&user("dora")).await.unwrap();
        assert!(deliveries(&f.bus).is_empty());
    }

    #[tokio::test]
    async fn session_opened_event_triggers_snapshot() {
        let f = fixture();
        let s = SensorId::new();
        f.sensors
            .upsert_all(&[Sensor::new(s, PlaceKey::new("Linz"))])
            .await
            .unwrap();
        f.user_sensors
            .upsert_all(&[UserSensor::new(user("emil"), s)])
            .await
            .unwrap();
        let distributor = Arc::new(f.distributor);
        distributor.register(f.bus.as_ref());

        f.bus
            .publish(LiveSessionOpened::new(user("emil")).to_envelope().unwrap())
            .await
            .unwrap();

        assert_eq!(deliveries(&f.bus).len(), 1);
    }
}

//! Shared wiring for the integration suites.
//!
//! Builds the whole pipeline on in-memory adapters: a recording event bus,
//! scripted weather and mock credentials.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use sensor_pilot::adapters::auth::MockSessionValidator;
use sensor_pilot::adapters::events::InMemoryEventBus;
use sensor_pilot::adapters::memory::{
    InMemoryPlaceHistoryRepository, InMemoryPlaceRepository, InMemoryPlcRepository,
    InMemorySensorPlcRepository, InMemorySensorRepository, InMemoryUserPlcRepository,
    InMemoryUserSensorRepository,
};
use sensor_pilot::adapters::weather::MockWeatherProvider;
use sensor_pilot::adapters::websocket::{LiveUpdateBridge, RecordingConnection};
use sensor_pilot::application::{
    DiagramStores, DiagramSubmittedHandler, DistributionStores, LiveSession, LiveSessionRegistry,
    PlaceAggregator, ReconcileDiagramCommand, ReconcileDiagramHandler, SessionGate,
    UpdateDistributor, WeatherOrchestrator,
};
use sensor_pilot::domain::diagram::{AcceptedDiagram, DiagramSubmission};
use sensor_pilot::domain::foundation::UserId;
use sensor_pilot::domain::live::{LiveFrame, SupersedePolicy, DIAGRAM_FRAME};
use sensor_pilot::ports::EventPublisher;

pub const AUTH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Pipeline {
    pub bus: Arc<InMemoryEventBus>,
    pub weather: Arc<MockWeatherProvider>,
    pub sensors: Arc<InMemorySensorRepository>,
    pub plcs: Arc<InMemoryPlcRepository>,
    pub user_sensors: Arc<InMemoryUserSensorRepository>,
    pub user_plcs: Arc<InMemoryUserPlcRepository>,
    pub sensor_plcs: Arc<InMemorySensorPlcRepository>,
    pub places: Arc<InMemoryPlaceRepository>,
    pub history: Arc<InMemoryPlaceHistoryRepository>,
    pub registry: Arc<LiveSessionRegistry>,
    pub gate: Arc<SessionGate>,
    pub reconciler: Arc<ReconcileDiagramHandler>,
}

impl Pipeline {
    pub fn new(weather: MockWeatherProvider, validator: MockSessionValidator) -> Self {
        Self::with_policy(weather, validator, SupersedePolicy::KeepOpen)
    }

    pub fn with_policy(
        weather: MockWeatherProvider,
        validator: MockSessionValidator,
        policy: SupersedePolicy,
    ) -> Self {
        let bus = Arc::new(InMemoryEventBus::recording());
        let publisher: Arc<dyn EventPublisher> = bus.clone();
        let weather = Arc::new(weather);

        let sensors = Arc::new(InMemorySensorRepository::new());
        let plcs = Arc::new(InMemoryPlcRepository::new());
        let user_sensors = Arc::new(InMemoryUserSensorRepository::new());
        let user_plcs = Arc::new(InMemoryUserPlcRepository::new());
        let sensor_plcs = Arc::new(InMemorySensorPlcRepository::new());
        let places = Arc::new(InMemoryPlaceRepository::new());
        let history = Arc::new(InMemoryPlaceHistoryRepository::new());

        let reconciler = Arc::new(ReconcileDiagramHandler::new(
            DiagramStores {
                sensors: sensors.clone(),
                plcs: plcs.clone(),
                user_sensors: user_sensors.clone(),
                user_plcs: user_plcs.clone(),
                sensor_plcs: sensor_plcs.clone(),
                places: places.clone(),
            },
            publisher.clone(),
        ));
        Arc::new(DiagramSubmittedHandler::new(reconciler.clone())).register(bus.as_ref());

        Arc::new(WeatherOrchestrator::new(
            places.clone(),
            weather.clone(),
            publisher.clone(),
        ))
        .register(bus.as_ref());

        Arc::new(PlaceAggregator::new(
            places.clone(),
            history.clone(),
            publisher.clone(),
        ))
        .register(bus.as_ref());

        Arc::new(UpdateDistributor::new(
            DistributionStores {
                sensors: sensors.clone(),
                user_sensors: user_sensors.clone(),
                user_plcs: user_plcs.clone(),
                sensor_plcs: sensor_plcs.clone(),
                places: places.clone(),
            },
            publisher.clone(),
        ))
        .register(bus.as_ref());

        let registry = Arc::new(LiveSessionRegistry::new(policy));
        LiveUpdateBridge::new_shared(registry.clone()).register(bus.as_ref());

        let gate = Arc::new(SessionGate::new(
            Arc::new(validator),
            registry.clone(),
            publisher,
            AUTH_TIMEOUT,
        ));

        Self {
            bus,
            weather,
            sensors,
            plcs,
            user_sensors,
            user_plcs,
            sensor_plcs,
            places,
            history,
            registry,
            gate,
            reconciler,
        }
    }

    /// Opens a recorded connection presenting `token` in the handshake.
    pub async fn connect(&self, token: Option<&str>) -> (Arc<RecordingConnection>, LiveSession) {
        let connection = Arc::new(RecordingConnection::new());
        let session = self
            .gate
            .open(connection.clone(), token.map(str::to_string))
            .await;
        (connection, session)
    }

    pub async fn submit(&self, user_id: &UserId, diagram: Value) -> AcceptedDiagram {
        let diagram: DiagramSubmission = serde_json::from_value(diagram).unwrap();
        self.reconciler
            .handle(ReconcileDiagramCommand {
                user_id: user_id.clone(),
                diagram,
            })
            .await
            .unwrap()
    }
}

pub fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

/// Data arrays of the diagram frames a connection received, in order.
pub fn diagram_batches(connection: &RecordingConnection) -> Vec<Vec<Value>> {
    connection
        .frames()
        .into_iter()
        .filter(|frame: &LiveFrame| frame.message_type == DIAGRAM_FRAME)
        .map(|frame| frame.content.data.as_array().cloned().unwrap_or_default())
        .collect()
}

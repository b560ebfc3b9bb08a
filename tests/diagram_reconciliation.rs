//! Diagram submissions against the fully wired pipeline.

mod common;

use serde_json::json;

use sensor_pilot::adapters::auth::MockSessionValidator;
use sensor_pilot::adapters::weather::MockWeatherProvider;
use sensor_pilot::domain::diagram::{DiagramSubmission, DiagramSubmitted};
use sensor_pilot::domain::foundation::{PlaceKey, SerializableDomainEvent};
use sensor_pilot::domain::place::{PlaceHistoryRequested, PlaceWeatherRequested};
use sensor_pilot::ports::{
    EventPublisher, PlaceRepository, SensorPlcRepository, UserPlcRepository, UserSensorRepository,
};

use common::{diagram_batches, user, Pipeline};

fn weather() -> MockWeatherProvider {
    MockWeatherProvider::new()
        .with_current("Lisbon", 20.0, "Sunny", "Europe")
        .with_history("Lisbon", vec![10.0, 12.0, 14.0])
        .with_current("Oslo", -3.0, "Snow", "Europe")
        .with_history("Oslo", vec![-5.0, -4.0])
}

#[tokio::test]
async fn resubmitting_without_a_sensor_drops_only_its_rows() {
    let pipeline = Pipeline::new(weather(), MockSessionValidator::new());
    let alice = user("alice");

    let first = pipeline
        .submit(
            &alice,
            json!({
                "sensors": [
                    {"place": "Lisbon", "connections": []},
                    {"place": "Oslo", "connections": []}
                ],
                "PLCs": [{"name": "Line 1"}]
            }),
        )
        .await;
    let plc = first.plcs[0].id;
    let kept = first.sensors[0].id;
    let dropped = first.sensors[1].id;

    pipeline
        .submit(
            &alice,
            json!({
                "sensors": [{
                    "id": kept,
                    "place": "Lisbon",
                    "connections": [{"PLCId": plc.to_string(), "port": 1}]
                }],
                "PLCs": [{"id": plc, "name": "Line 1"}]
            }),
        )
        .await;

    let owned = pipeline.user_sensors.find_by_user(&alice).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].sensor_id, kept);

    // The catalog is shared, so the dropped sensor itself stays
    assert!(pipeline.sensors.get(&dropped).await.is_some());

    let edges = pipeline.sensor_plcs.find_by_owner(&alice).await.unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].sensor_id, kept);
    assert_eq!(pipeline.user_plcs.find_by_user(&alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn second_user_at_a_known_place_gets_readings_without_a_new_lookup() {
    let pipeline = Pipeline::new(weather(), MockSessionValidator::new());

    pipeline
        .submit(
            &user("alice"),
            json!({"sensors": [{"place": "Lisbon"}], "PLCs": []}),
        )
        .await;
    let lookups = pipeline.weather.calls().len();
    let weather_requests = pipeline.bus.events_of_type(PlaceWeatherRequested::EVENT_TYPE).len();

    let accepted = pipeline
        .submit(
            &user("bob"),
            json!({"sensors": [{"place": "Lisbon"}], "PLCs": []}),
        )
        .await;

    assert_eq!(pipeline.weather.calls().len(), lookups);
    assert_eq!(
        pipeline.bus.events_of_type(PlaceWeatherRequested::EVENT_TYPE).len(),
        weather_requests
    );
    assert_eq!(accepted.readings.len(), 1);
    assert_eq!(accepted.readings[0].temperature, Some(20.0));
    assert_eq!(accepted.readings[0].average_temperature, Some(14.0));
}

#[tokio::test]
async fn places_are_requested_once_per_distinct_key() {
    let pipeline = Pipeline::new(weather(), MockSessionValidator::new());

    pipeline
        .submit(
            &user("carol"),
            json!({
                "sensors": [
                    {"place": "Oslo"},
                    {"place": " Oslo "},
                    {"place": "Lisbon"},
                    {"place": ""}
                ],
                "PLCs": []
            }),
        )
        .await;

    assert_eq!(
        pipeline.bus.events_of_type(PlaceHistoryRequested::EVENT_TYPE).len(),
        2
    );
    assert_eq!(
        pipeline.bus.events_of_type(PlaceWeatherRequested::EVENT_TYPE).len(),
        1
    );
    let stored = pipeline.places.find_all().await.unwrap();
    let mut keys: Vec<&str> = stored.iter().map(|p| p.key.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["Lisbon", "Oslo"]);
}

#[tokio::test]
async fn submission_event_on_the_bus_is_reconciled() {
    let pipeline = Pipeline::new(weather(), MockSessionValidator::new());
    let dave = user("dave");
    let diagram: DiagramSubmission =
        serde_json::from_value(json!({"sensors": [{"place": "Oslo"}], "PLCs": []})).unwrap();

    pipeline
        .bus
        .publish(DiagramSubmitted::new(dave.clone(), diagram).to_envelope().unwrap())
        .await
        .unwrap();

    assert_eq!(pipeline.user_sensors.find_by_user(&dave).await.unwrap().len(), 1);
    let oslo = pipeline.places.find(&PlaceKey::new("Oslo")).await.unwrap().unwrap();
    assert_eq!(oslo.temperature, Some(-3.0));
}

#[tokio::test]
async fn connected_submitter_receives_fresh_readings() {
    let pipeline = Pipeline::new(
        weather(),
        MockSessionValidator::new().with_test_user("tok-erin", "erin"),
    );
    let (connection, _session) = pipeline.connect(Some("tok-erin")).await;

    pipeline
        .submit(
            &user("erin"),
            json!({"sensors": [{"place": "Lisbon"}], "PLCs": []}),
        )
        .await;

    let batches = diagram_batches(&connection);
    let lisbon = batches
        .iter()
        .flatten()
        .find(|reading| reading["place"] == "Lisbon")
        .expect("a Lisbon reading is pushed");
    assert_eq!(lisbon["temperature"], 20.0);
    assert_eq!(lisbon["averageTemperature"], 14.0);
    assert_eq!(lisbon["condition"], "Sunny");
}

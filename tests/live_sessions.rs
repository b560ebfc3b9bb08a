//! Live session lifecycle over recorded connections.

mod common;

use std::time::Duration;

use serde_json::json;

use sensor_pilot::adapters::auth::MockSessionValidator;
use sensor_pilot::adapters::weather::MockWeatherProvider;
use sensor_pilot::application::HeartbeatService;
use sensor_pilot::domain::foundation::AuthError;
use sensor_pilot::domain::live::{
    SessionState, SupersedePolicy, AUTHENTICATION_TIMEOUT, ERROR_FRAME, HEARTBEAT_FRAME,
    INVALID_CREDENTIALS,
};

use common::{diagram_batches, user, Pipeline, AUTH_TIMEOUT};

fn validator() -> MockSessionValidator {
    MockSessionValidator::new()
        .with_test_user("tok-alice", "alice")
        .with_test_user("tok-carol", "carol")
        .with_rejection("tok-revoked", AuthError::TokenRevoked)
}

fn weather() -> MockWeatherProvider {
    MockWeatherProvider::new()
        .with_current("Lisbon", 20.0, "Sunny", "Europe")
        .with_history("Lisbon", vec![10.0, 12.0, 14.0])
}

async fn pipeline_with_alice_at_lisbon(policy: SupersedePolicy) -> Pipeline {
    let pipeline = Pipeline::with_policy(weather(), validator(), policy);
    pipeline
        .submit(&user("alice"), json!({"sensors": [{"place": "Lisbon"}], "PLCs": []}))
        .await;
    pipeline
}

#[tokio::test]
async fn authenticated_user_gets_current_readings_on_connect() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;

    let (connection, session) = pipeline.connect(Some("tok-alice")).await;

    assert_eq!(session.state(), SessionState::Authenticated);
    assert!(pipeline.registry.is_connected(&user("alice")).await);

    let batches = diagram_batches(&connection);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0]["place"], "Lisbon");
    assert_eq!(batches[0][0]["temperature"], 20.0);
    assert_eq!(batches[0][0]["averageTemperature"], 14.0);
}

#[tokio::test]
async fn user_without_sensors_gets_no_catch_up() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;

    let (connection, session) = pipeline.connect(Some("tok-carol")).await;

    assert_eq!(session.state(), SessionState::Authenticated);
    assert!(connection.texts().is_empty());
}

#[tokio::test]
async fn any_client_message_requests_a_fresh_snapshot() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;
    let (connection, session) = pipeline.connect(Some("tok-alice")).await;

    pipeline.gate.on_message(&session).await;

    assert_eq!(diagram_batches(&connection).len(), 2);
}

#[tokio::test]
async fn refused_credential_gets_error_frame_and_close() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;

    let (connection, session) = pipeline.connect(Some("tok-revoked")).await;

    assert_eq!(session.state(), SessionState::Closed);
    let frames = connection.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].message_type, ERROR_FRAME);
    assert_eq!(frames[0].content.data["message"], INVALID_CREDENTIALS);
    assert_eq!(connection.close_count(), 1);
    assert_eq!(pipeline.registry.session_count().await, 0);
    assert_eq!(pipeline.gate.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn silent_connection_is_closed_after_auth_timeout() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;

    let (connection, _session) = pipeline.connect(None).await;
    assert_eq!(pipeline.gate.pending_count(), 1);

    tokio::time::sleep(AUTH_TIMEOUT + Duration::from_secs(1)).await;

    let frames = connection.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].content.data["message"], AUTHENTICATION_TIMEOUT);
    assert_eq!(connection.close_count(), 1);
    assert_eq!(pipeline.gate.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn authenticated_connection_survives_the_timeout() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;

    let (connection, _session) = pipeline.connect(Some("tok-alice")).await;
    tokio::time::sleep(AUTH_TIMEOUT * 2).await;

    assert_eq!(connection.close_count(), 0);
    assert!(pipeline.registry.is_connected(&user("alice")).await);
}

#[tokio::test]
async fn reconnect_routes_updates_to_the_newest_connection() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;
    let (old, mut old_session) = pipeline.connect(Some("tok-alice")).await;
    let (new, _new_session) = pipeline.connect(Some("tok-alice")).await;
    let old_before = old.texts().len();
    let new_before = diagram_batches(&new).len();

    pipeline
        .submit(&user("alice"), json!({"sensors": [{"place": "Lisbon"}], "PLCs": []}))
        .await;

    assert_eq!(old.texts().len(), old_before);
    assert!(diagram_batches(&new).len() > new_before);
    assert_eq!(old.close_count(), 0);

    // The stale socket closing must not unregister the live one
    pipeline.gate.on_close(&mut old_session).await;
    assert!(pipeline.registry.is_connected(&user("alice")).await);
}

#[tokio::test]
async fn superseded_connection_is_closed_when_configured() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::CloseSuperseded).await;

    let (old, _old_session) = pipeline.connect(Some("tok-alice")).await;
    let (new, _new_session) = pipeline.connect(Some("tok-alice")).await;

    assert_eq!(old.close_count(), 1);
    assert_eq!(new.close_count(), 0);
    assert_eq!(pipeline.registry.session_count().await, 1);
}

#[tokio::test]
async fn heartbeat_pings_live_sessions_and_reaps_vanished_ones() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;
    let (alice, _a) = pipeline.connect(Some("tok-alice")).await;
    let (carol, _c) = pipeline.connect(Some("tok-carol")).await;
    carol.drop_transport();

    let report = HeartbeatService::new(pipeline.registry.clone())
        .sweep_once()
        .await;

    assert_eq!(report.pinged, 1);
    assert_eq!(report.reaped, 1);
    assert!(!pipeline.registry.is_connected(&user("carol")).await);
    let last = alice.frames().pop().unwrap();
    assert_eq!(last.message_type, HEARTBEAT_FRAME);
}

#[tokio::test]
async fn failed_write_evicts_the_session() {
    let pipeline = pipeline_with_alice_at_lisbon(SupersedePolicy::KeepOpen).await;
    let (connection, _session) = pipeline.connect(Some("tok-alice")).await;
    connection.fail_writes();

    pipeline
        .submit(&user("alice"), json!({"sensors": [{"place": "Lisbon"}], "PLCs": []}))
        .await;

    assert!(!pipeline.registry.is_connected(&user("alice")).await);
}

//! HTTP handlers for diagram endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::handle_domain_error;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{ReconcileDiagramCommand, ReconcileDiagramHandler};
use crate::domain::diagram::DiagramSubmission;

#[derive(Clone)]
pub struct DiagramHandlers {
    reconcile_handler: Arc<ReconcileDiagramHandler>,
}

impl DiagramHandlers {
    pub fn new(reconcile_handler: Arc<ReconcileDiagramHandler>) -> Self {
        Self { reconcile_handler }
    }
}

/// PUT /api/diagram - Store the caller's diagram and echo the accepted graph
pub async fn put_diagram(
    State(handlers): State<DiagramHandlers>,
    RequireAuth(user): RequireAuth,
    Json(diagram): Json<DiagramSubmission>,
) -> Response {
    let cmd = ReconcileDiagramCommand {
        user_id: user.id,
        diagram,
    };

    match handlers.reconcile_handler.handle(cmd).await {
        Ok(accepted) => (StatusCode::OK, Json(accepted)).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::http::diagram::diagram_routes;
    use crate::adapters::http::middleware::{cookie_auth_middleware, CookieAuth};
    use crate::adapters::memory::{
        InMemoryPlaceRepository, InMemoryPlcRepository, InMemorySensorPlcRepository,
        InMemorySensorRepository, InMemoryUserPlcRepository, InMemoryUserSensorRepository,
    };
    use crate::application::handlers::DiagramStores;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::{middleware, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, Arc<InMemoryUserSensorRepository>) {
        let user_sensors = Arc::new(InMemoryUserSensorRepository::new());
        let stores = DiagramStores {
            sensors: Arc::new(InMemorySensorRepository::new()),
            plcs: Arc::new(InMemoryPlcRepository::new()),
            user_sensors: user_sensors.clone(),
            user_plcs: Arc::new(InMemoryUserPlcRepository::new()),
            sensor_plcs: Arc::new(InMemorySensorPlcRepository::new()),
            places: Arc::new(InMemoryPlaceRepository::new()),
        };
        let reconciler = Arc::new(ReconcileDiagramHandler::new(
            stores,
            Arc::new(InMemoryEventBus::new()),
        ));
        let auth = CookieAuth::new(
            Arc::new(MockSessionValidator::new().with_test_user("tok", "plant@example.com")),
            "jwt",
        );

        let router = diagram_routes(DiagramHandlers::new(reconciler))
            .layer(middleware::from_fn_with_state(auth, cookie_auth_middleware));
        (router, user_sensors)
    }

    fn put(body: Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::PUT)
            .uri("/api/diagram")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn put_diagram_returns_accepted_graph_with_ids() {
        let (app, user_sensors) = app();
        let body = json!({
            "sensors": [{"place": "Lisbon", "connections": []}],
            "PLCs": [{"name": "Line 1"}]
        });

        let response = app.oneshot(put(body, Some("jwt=tok"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let accepted: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(accepted["sensors"][0]["id"].is_string());
        assert!(accepted["PLCs"][0]["id"].is_string());
        assert_eq!(user_sensors.all().await.len(), 1);
    }

    #[tokio::test]
    async fn put_diagram_without_cookie_is_unauthorized() {
        let (app, user_sensors) = app();

        let response = app
            .oneshot(put(json!({"sensors": [], "PLCs": []}), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(user_sensors.all().await.is_empty());
    }
}

//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use wayfarer_core::lock::IdentityLocks;
use wayfarer_durable_store::pg_location_repository::PgLocationRepository;
use wayfarer_durable_store::pg_player_repository::PgPlayerRepository;
use wayfarer_players::domain::credentials::AuthSettings;
use wayfarer_test_support::{FixedClock, InMemoryEphemeralStore};

use wayfarer_api::state::AppState;

/// Build the full app router with real `PostgreSQL` repositories, an
/// in-memory ephemeral store and a fixed clock. Uses the same router as
/// `main.rs`.
///
/// The returned store lets tests inspect positions and membership sets.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<InMemoryEphemeralStore>) {
    let store = Arc::new(InMemoryEphemeralStore::new());
    let app_state = AppState::new(
        Arc::new(PgPlayerRepository::new(pool.clone())),
        Arc::new(PgLocationRepository::new(pool)),
        store.clone(),
        IdentityLocks::new(Duration::from_secs(1)),
        Arc::new(FixedClock::default_instant()),
        AuthSettings {
            secret: "integration-secret".to_string(),
            token_ttl: chrono::Duration::hours(1),
        },
    );

    (wayfarer_api::app(app_state), store)
}

/// Send a request with an optional JSON body. An empty response body comes
/// back as `Value::Null`.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, Some(body)).await
}

/// Send a PATCH request with a JSON body and return the response.
pub async fn patch_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "PATCH", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "GET", uri, None).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "DELETE", uri, None).await
}

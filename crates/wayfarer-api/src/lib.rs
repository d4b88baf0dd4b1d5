//! Wayfarer: HTTP API.
//!
//! Exposes the player and location operations over JSON. `main.rs` wires the
//! real stores into [`state::AppState`]; tests wire in-memory ones.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the full application router.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

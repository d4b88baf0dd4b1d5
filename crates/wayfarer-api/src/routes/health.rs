//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

const PROBE_KEY: &str = "health:probe";

/// Reachability of one backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    /// The probe read succeeded.
    Up,
    /// The probe read failed.
    Down,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every store is up, `degraded` otherwise.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// The relational store.
    pub durable: Probe,
    /// The keyed store holding positions.
    pub ephemeral: Probe,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let durable = match state.locations.count_locations(PROBE_KEY).await {
        Ok(_) => Probe::Up,
        Err(e) => {
            warn!(error = %e, "durable store probe failed");
            Probe::Down
        }
    };
    let ephemeral = match state.store.exists(PROBE_KEY).await {
        Ok(_) => Probe::Up,
        Err(e) => {
            warn!(error = %e, "ephemeral store probe failed");
            Probe::Down
        }
    };

    let healthy = durable == Probe::Up && ephemeral == Probe::Up;
    let (code, status) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            durable,
            ephemeral,
        }),
    )
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

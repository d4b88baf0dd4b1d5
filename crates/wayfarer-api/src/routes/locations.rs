//! Routes for the Locations bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use wayfarer_core::model::LocationRecord;
use wayfarer_core::position::PlayerPosition;
use wayfarer_locations::application::{command_handlers, query_handlers};
use wayfarer_locations::domain::cascade::{CascadeReport, LocationUpdate};
use wayfarer_locations::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /locations.
#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    /// Unique location name.
    pub name: String,
    /// Origin x coordinate.
    #[serde(default)]
    pub x: i32,
    /// Origin y coordinate.
    #[serde(default)]
    pub y: i32,
}

/// Request body for PATCH /locations/{name}.
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    /// New name; the current one is kept when absent.
    pub name: Option<String>,
    /// New origin x coordinate.
    pub x: i32,
    /// New origin y coordinate.
    pub y: i32,
}

/// POST /locations
#[instrument(skip(state, request), fields(location = %request.name))]
async fn create_location(
    State(state): State<AppState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<LocationRecord>), ApiError> {
    let command = commands::CreateLocation {
        correlation_id: Uuid::new_v4(),
        name: request.name,
        x: request.x,
        y: request.y,
    };

    super::log_command(&command);

    let location = command_handlers::handle_create_location(
        &command,
        state.clock.as_ref(),
        &*state.locations,
        &state.locks,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(location)))
}

/// GET /locations
#[instrument(skip(state))]
async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<LocationRecord>>, ApiError> {
    let locations = query_handlers::list_locations(&*state.locations).await?;
    Ok(Json(locations))
}

/// GET /locations/{name}
#[instrument(skip(state))]
async fn get_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<LocationRecord>, ApiError> {
    let location = query_handlers::get_location(&name, &*state.locations).await?;
    Ok(Json(location))
}

/// PATCH /locations/{name}
#[instrument(skip(state, request))]
async fn update_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<LocationUpdate>, ApiError> {
    let command = commands::UpdateLocation {
        correlation_id: Uuid::new_v4(),
        name: request.name.unwrap_or_else(|| name.clone()),
        current_name: name,
        x: request.x,
        y: request.y,
    };

    super::log_command(&command);

    let update = command_handlers::handle_update_location(
        &command,
        state.clock.as_ref(),
        &*state.locations,
        &*state.store,
        &state.locks,
    )
    .await?;

    Ok(Json(update))
}

/// DELETE /locations/{name}
#[instrument(skip(state))]
async fn delete_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CascadeReport>, ApiError> {
    let command = commands::DeleteLocation {
        correlation_id: Uuid::new_v4(),
        name,
    };

    super::log_command(&command);

    let cascade = command_handlers::handle_delete_location(
        &command,
        &*state.locations,
        &*state.store,
        &state.locks,
    )
    .await?;

    Ok(Json(cascade))
}

/// GET /locations/{name}/players
#[instrument(skip(state))]
async fn list_players_in_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<PlayerPosition>>, ApiError> {
    let members = query_handlers::list_players_in_location(
        &name,
        &*state.locations,
        &*state.store,
        &state.locks,
    )
    .await?;
    Ok(Json(members))
}

/// Returns the router for the locations context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route(
            "/locations/{name}",
            get(get_location)
                .patch(update_location)
                .delete(delete_location),
        )
        .route("/locations/{name}/players", get(list_players_in_location))
}

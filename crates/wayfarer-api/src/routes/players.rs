//! Routes for the Players bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use wayfarer_core::position::Position;
use wayfarer_players::application::{command_handlers, query_handlers};
use wayfarer_players::domain::commands;
use wayfarer_players::domain::credentials::AuthToken;
use wayfarer_players::domain::player::PlayerView;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /players and POST /login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// The player's username.
    pub username: String,
    /// The cleartext password.
    pub password: String,
}

/// Request body for PATCH /players/{username}. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    /// New username.
    pub username: Option<String>,
    /// New password.
    pub password: Option<String>,
}

/// Request body for POST /players/{username}/travel.
#[derive(Debug, Deserialize)]
pub struct TravelRequest {
    /// Name of the location to travel to.
    pub destination: String,
}

/// Request body for POST /players/{username}/move.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    /// New x coordinate.
    pub x: i32,
    /// New y coordinate.
    pub y: i32,
}

/// POST /players
#[instrument(skip(state, request), fields(username = %request.username))]
async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<PlayerView>), ApiError> {
    let command = commands::CreatePlayer {
        correlation_id: Uuid::new_v4(),
        username: request.username,
        password: request.password,
    };

    super::log_command(&command);

    let view = command_handlers::handle_create_player(
        &command,
        state.clock.as_ref(),
        &*state.players,
        &state.locks,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /login
#[instrument(skip(state, request), fields(username = %request.username))]
async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<AuthToken>, ApiError> {
    let command = commands::AuthPlayer {
        correlation_id: Uuid::new_v4(),
        username: request.username,
        password: request.password,
    };

    super::log_command(&command);

    let token = command_handlers::handle_auth_player(
        &command,
        state.clock.as_ref(),
        &*state.players,
        &state.auth,
    )
    .await?;

    Ok(Json(token))
}

/// GET /players
#[instrument(skip(state))]
async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<PlayerView>>, ApiError> {
    let views = query_handlers::list_players(&*state.players, &*state.store).await?;
    Ok(Json(views))
}

/// GET /players/{username}
#[instrument(skip(state))]
async fn get_player(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PlayerView>, ApiError> {
    let view = query_handlers::get_player(&username, &*state.players, &*state.store).await?;
    Ok(Json(view))
}

/// PATCH /players/{username}
#[instrument(skip(state, request))]
async fn update_player(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerView>, ApiError> {
    let command = commands::UpdatePlayer {
        correlation_id: Uuid::new_v4(),
        username,
        new_username: request.username,
        password: request.password,
    };

    super::log_command(&command);

    let view = command_handlers::handle_update_player(
        &command,
        state.clock.as_ref(),
        &*state.players,
        &*state.store,
        &state.locks,
    )
    .await?;

    Ok(Json(view))
}

/// DELETE /players/{username}
#[instrument(skip(state))]
async fn delete_player(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeletePlayer {
        correlation_id: Uuid::new_v4(),
        username,
    };

    super::log_command(&command);

    command_handlers::handle_delete_player(&command, &*state.players, &*state.store, &state.locks)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /players/{username}/travel
#[instrument(skip(state, request), fields(destination = %request.destination))]
async fn travel(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<TravelRequest>,
) -> Result<Json<Position>, ApiError> {
    let command = commands::Travel {
        correlation_id: Uuid::new_v4(),
        username,
        destination: request.destination,
    };

    super::log_command(&command);

    let position = command_handlers::handle_travel(
        &command,
        &*state.players,
        &*state.locations,
        &*state.store,
        &state.locks,
    )
    .await?;

    Ok(Json(position))
}

/// POST /players/{username}/move
#[instrument(skip(state, request), fields(x = request.x, y = request.y))]
async fn move_player(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<StatusCode, ApiError> {
    let command = commands::Move {
        correlation_id: Uuid::new_v4(),
        username,
        x: request.x,
        y: request.y,
    };

    super::log_command(&command);

    command_handlers::handle_move(&command, &*state.store, &state.locks).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the players context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/players", post(create_player).get(list_players))
        .route(
            "/players/{username}",
            get(get_player).patch(update_player).delete(delete_player),
        )
        .route("/players/{username}/travel", post(travel))
        .route("/players/{username}/move", post(move_player))
        .route("/login", post(login))
}

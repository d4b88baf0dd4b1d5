//! Route modules organized by bounded context.

use axum::Router;
use tracing::info;
use wayfarer_core::command::Command;

use crate::state::AppState;

pub mod health;
pub mod locations;
pub mod players;

/// Every route served under `/api/v1`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(players::router())
        .merge(locations::router())
}

fn log_command(command: &dyn Command) {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        subject = command.subject(),
        "handling command"
    );
}

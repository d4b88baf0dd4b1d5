//! Query handlers for the Players context.
//!
//! Reads join the durable row with the live position, if there is one.

use wayfarer_core::ephemeral::{EphemeralStore, PositionLedger};
use wayfarer_core::error::DomainError;
use wayfarer_core::repository::PlayerRepository;

use crate::domain::player::PlayerView;

/// Retrieves a player and their position.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown username and
/// `DomainError::Internal` if the stored position cannot be decoded.
pub async fn get_player(
    username: &str,
    players: &dyn PlayerRepository,
    store: &dyn EphemeralStore,
) -> Result<PlayerView, DomainError> {
    let record = players
        .find_player(username)
        .await?
        .ok_or_else(|| DomainError::player_not_found(username))?;
    let position = PositionLedger::new(store).position_of(username).await?;
    Ok(PlayerView::from_record(record, position))
}

/// Lists every player with their position, ordered by username.
///
/// # Errors
///
/// Returns store errors, or `DomainError::Internal` if any stored position
/// cannot be decoded.
pub async fn list_players(
    players: &dyn PlayerRepository,
    store: &dyn EphemeralStore,
) -> Result<Vec<PlayerView>, DomainError> {
    let ledger = PositionLedger::new(store);
    let records = players.list_players().await?;

    let mut views = Vec::with_capacity(records.len());
    for record in records {
        let position = ledger.position_of(&record.username).await?;
        views.push(PlayerView::from_record(record, position));
    }
    Ok(views)
}

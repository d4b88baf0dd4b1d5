//! Command handlers for the Players context.
//!
//! Each handler validates its command, takes the identity locks for every
//! player and location it will touch, then performs its store writes in a
//! fixed order. The writes are not atomic as a whole: a failure part way
//! through surfaces as an error and leaves earlier writes in place.

use tracing::{info, warn};
use wayfarer_core::clock::Clock;
use wayfarer_core::command::Command;
use wayfarer_core::ephemeral::{EphemeralStore, PositionLedger};
use wayfarer_core::error::{DomainError, EntityKind};
use wayfarer_core::lock::{IdentityLocks, LockKey};
use wayfarer_core::model::PlayerRecord;
use wayfarer_core::position::{PlayerPosition, Position};
use wayfarer_core::repository::{LocationRepository, PlayerRepository};

use crate::application::locking::lock_player_in_place;
use crate::domain::commands::{AuthPlayer, CreatePlayer, DeletePlayer, Move, Travel, UpdatePlayer};
use crate::domain::credentials::{AuthSettings, AuthToken, hash_password, verify_password};
use crate::domain::player::PlayerView;

pub(crate) fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Handles the `CreatePlayer` command: checks the username is free, hashes
/// the password and inserts the row.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty username or password,
/// `DomainError::DuplicateIdentity` if the username is taken, and store or
/// hashing errors as they occur.
pub async fn handle_create_player(
    command: &CreatePlayer,
    clock: &dyn Clock,
    players: &dyn PlayerRepository,
    locks: &IdentityLocks,
) -> Result<PlayerView, DomainError> {
    require("username", &command.username)?;
    require("password", &command.password)?;

    let _guard = locks.acquire([LockKey::player(&command.username)]).await?;

    if players.count_players(&command.username).await? != 0 {
        warn!(
            correlation_id = %command.correlation_id(),
            username = %command.username,
            "attempt to create a duplicate player"
        );
        return Err(DomainError::DuplicateIdentity {
            entity: EntityKind::Player,
            id: command.username.clone(),
        });
    }

    let now = clock.now();
    let record = PlayerRecord {
        username: command.username.clone(),
        password_hash: hash_password(&command.password)?,
        created_at: now,
        updated_at: now,
    };
    players.insert_player(&record).await?;

    info!(
        correlation_id = %command.correlation_id(),
        username = %record.username,
        "player created"
    );
    Ok(PlayerView::from_record(record, None))
}

/// Handles the `AuthPlayer` command: checks the password and issues a token.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown username,
/// `DomainError::AuthFailure` for a wrong password, and
/// `DomainError::Internal` if the token expiry is out of range.
pub async fn handle_auth_player(
    command: &AuthPlayer,
    clock: &dyn Clock,
    players: &dyn PlayerRepository,
    settings: &AuthSettings,
) -> Result<AuthToken, DomainError> {
    let record = players
        .find_player(&command.username)
        .await?
        .ok_or_else(|| DomainError::player_not_found(&command.username))?;

    if !verify_password(&command.password, &record.password_hash) {
        warn!(
            correlation_id = %command.correlation_id(),
            username = %command.username,
            "failed player login"
        );
        return Err(DomainError::AuthFailure);
    }

    AuthToken::issue(&record.username, settings, clock)
}

/// Handles the `UpdatePlayer` command: replaces the password.
///
/// # Errors
///
/// Returns `DomainError::Unimplemented` for a username change,
/// `DomainError::Validation` when no new password is given and
/// `DomainError::NotFound` for an unknown player.
pub async fn handle_update_player(
    command: &UpdatePlayer,
    clock: &dyn Clock,
    players: &dyn PlayerRepository,
    store: &dyn EphemeralStore,
    locks: &IdentityLocks,
) -> Result<PlayerView, DomainError> {
    if command
        .new_username
        .as_ref()
        .is_some_and(|name| *name != command.username)
    {
        // The username keys the position and every membership entry.
        return Err(DomainError::Unimplemented("renaming a player"));
    }
    let password = command.password.as_deref().unwrap_or_default();
    require("password", password)?;

    let _guard = locks.acquire([LockKey::player(&command.username)]).await?;

    let hash = hash_password(password)?;
    let record = players
        .update_password(&command.username, &hash, clock.now())
        .await?
        .ok_or_else(|| DomainError::player_not_found(&command.username))?;

    let position = PositionLedger::new(store)
        .position_of(&command.username)
        .await?;

    info!(
        correlation_id = %command.correlation_id(),
        username = %command.username,
        "player password changed"
    );
    Ok(PlayerView::from_record(record, position))
}

/// Handles the `DeletePlayer` command: deletes the row, then the player's
/// position and their entry in that location's membership set.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no row was deleted, and store errors
/// as they occur.
pub async fn handle_delete_player(
    command: &DeletePlayer,
    players: &dyn PlayerRepository,
    store: &dyn EphemeralStore,
    locks: &IdentityLocks,
) -> Result<(), DomainError> {
    let ledger = PositionLedger::new(store);
    let (_guard, current) = lock_player_in_place(locks, &ledger, &command.username, None).await?;

    if players.delete_player(&command.username).await? == 0 {
        warn!(
            correlation_id = %command.correlation_id(),
            username = %command.username,
            "cannot delete nonexistent player"
        );
        return Err(DomainError::player_not_found(&command.username));
    }

    if let Some(position) = current {
        ledger.clear(&command.username).await?;
        ledger
            .leave(&PlayerPosition::new(&command.username, position))
            .await?;
    }

    info!(
        correlation_id = %command.correlation_id(),
        username = %command.username,
        "player deleted"
    );
    Ok(())
}

/// Handles the `Travel` command: moves the player to the origin of the
/// destination location.
///
/// Steps: leave the old location's membership set, overwrite the position
/// with a fresh expiry, join the new location's set.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the player or the destination does
/// not exist, and store errors as they occur.
pub async fn handle_travel(
    command: &Travel,
    players: &dyn PlayerRepository,
    locations: &dyn LocationRepository,
    store: &dyn EphemeralStore,
    locks: &IdentityLocks,
) -> Result<Position, DomainError> {
    require("location", &command.destination)?;

    let ledger = PositionLedger::new(store);
    let (_guard, current) = lock_player_in_place(
        locks,
        &ledger,
        &command.username,
        Some(LockKey::location(&command.destination)),
    )
    .await?;

    if players.count_players(&command.username).await? == 0 {
        return Err(DomainError::player_not_found(&command.username));
    }
    if locations.count_locations(&command.destination).await? == 0 {
        return Err(DomainError::location_not_found(&command.destination));
    }

    if let Some(previous) = current {
        ledger
            .leave(&PlayerPosition::new(&command.username, previous))
            .await?;
    }

    let position = Position::at_origin(&command.destination);
    ledger.place(&command.username, &position).await?;
    ledger
        .join(&PlayerPosition::new(&command.username, position.clone()))
        .await?;

    info!(
        correlation_id = %command.correlation_id(),
        username = %command.username,
        location = %command.destination,
        "player travelled"
    );
    Ok(position)
}

/// Handles the `Move` command: changes the player's offset within their
/// current location.
///
/// # Errors
///
/// Returns `DomainError::NotInLocation` if the player has no live position,
/// and store errors as they occur.
pub async fn handle_move(
    command: &Move,
    store: &dyn EphemeralStore,
    locks: &IdentityLocks,
) -> Result<(), DomainError> {
    let ledger = PositionLedger::new(store);
    let (_guard, current) = lock_player_in_place(locks, &ledger, &command.username, None).await?;

    let Some(previous) = current else {
        return Err(DomainError::NotInLocation(command.username.clone()));
    };

    let moved = Position {
        x: command.x,
        y: command.y,
        ..previous.clone()
    };

    ledger
        .leave(&PlayerPosition::new(&command.username, previous))
        .await?;
    ledger.place(&command.username, &moved).await?;
    ledger
        .join(&PlayerPosition::new(&command.username, moved))
        .await?;

    info!(
        correlation_id = %command.correlation_id(),
        username = %command.username,
        x = command.x,
        y = command.y,
        "player moved"
    );
    Ok(())
}

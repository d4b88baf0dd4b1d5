//! Query handlers for the Locations context.

use tracing::{debug, info};
use wayfarer_core::ephemeral::{EphemeralStore, PositionLedger};
use wayfarer_core::error::DomainError;
use wayfarer_core::lock::{IdentityLocks, LockKey};
use wayfarer_core::model::LocationRecord;
use wayfarer_core::position::PlayerPosition;
use wayfarer_core::repository::LocationRepository;

/// Retrieves a location by name.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no location has that name.
pub async fn get_location(
    name: &str,
    locations: &dyn LocationRepository,
) -> Result<LocationRecord, DomainError> {
    locations
        .find_location(name)
        .await?
        .ok_or_else(|| DomainError::location_not_found(name))
}

/// Lists every location, ordered by name.
///
/// # Errors
///
/// Returns the store's error.
pub async fn list_locations(
    locations: &dyn LocationRepository,
) -> Result<Vec<LocationRecord>, DomainError> {
    locations.list_locations().await
}

/// Lists the players currently in a location with their positions, ordered
/// by username.
///
/// Membership entries have no expiry of their own. An entry whose player no
/// longer holds that exact position (the position expired, or a partial
/// write left it behind) is removed from the set instead of being listed.
/// The location lock is held throughout so no travel or cascade interleaves
/// with the sweep.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown location,
/// `DomainError::Conflict` if the location stays locked past the wait, and
/// `DomainError::Internal` if a membership entry or a member's position
/// cannot be decoded.
pub async fn list_players_in_location(
    name: &str,
    locations: &dyn LocationRepository,
    store: &dyn EphemeralStore,
    locks: &IdentityLocks,
) -> Result<Vec<PlayerPosition>, DomainError> {
    let _guard = locks.acquire([LockKey::location(name)]).await?;

    if locations.count_locations(name).await? == 0 {
        return Err(DomainError::location_not_found(name));
    }

    let ledger = PositionLedger::new(store);
    let entries = ledger
        .members(name)
        .await?
        .iter()
        .map(|token| PlayerPosition::decode(token))
        .collect::<Result<Vec<_>, _>>()?;

    let mut members = Vec::with_capacity(entries.len());
    let mut pruned = 0_usize;
    for entry in entries {
        if ledger.position_of(&entry.username).await?.as_ref() == Some(&entry.position) {
            members.push(entry);
        } else {
            ledger.leave(&entry).await?;
            pruned += 1;
        }
    }
    members.sort_by(|a, b| a.username.cmp(&b.username));

    if pruned > 0 {
        info!(location = name, pruned, "pruned stale membership entries");
    }
    debug!(location = name, count = members.len(), "listed members");
    Ok(members)
}

//! Command handlers for the Locations context.
//!
//! Renaming or deleting a location changes the key that positions and
//! membership sets join on, so both handlers walk the location's membership
//! set after the durable write and repair each member's position. The
//! location locks held for the whole walk keep Travel and Move out of the
//! affected locations until it finishes.

use tracing::{debug, info, warn};
use wayfarer_core::clock::Clock;
use wayfarer_core::command::Command;
use wayfarer_core::ephemeral::{EphemeralStore, PositionLedger};
use wayfarer_core::error::{DomainError, EntityKind};
use wayfarer_core::lock::{IdentityLocks, LockKey};
use wayfarer_core::model::LocationRecord;
use wayfarer_core::position::{PlayerPosition, Position};
use wayfarer_core::repository::LocationRepository;

use crate::domain::cascade::{CascadeReport, LocationUpdate};
use crate::domain::commands::{CreateLocation, DeleteLocation, UpdateLocation};

fn require_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation(
            "location name must not be empty".into(),
        ));
    }
    Ok(())
}

/// Handles the `CreateLocation` command: checks the name is free and
/// inserts the row.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty name,
/// `DomainError::DuplicateIdentity` if the name is taken, and store errors
/// as they occur.
pub async fn handle_create_location(
    command: &CreateLocation,
    clock: &dyn Clock,
    locations: &dyn LocationRepository,
    locks: &IdentityLocks,
) -> Result<LocationRecord, DomainError> {
    require_name(&command.name)?;

    let _guard = locks.acquire([LockKey::location(&command.name)]).await?;

    if locations.count_locations(&command.name).await? != 0 {
        warn!(
            correlation_id = %command.correlation_id(),
            location = %command.name,
            "attempt to create a duplicate location"
        );
        return Err(DomainError::DuplicateIdentity {
            entity: EntityKind::Location,
            id: command.name.clone(),
        });
    }

    let now = clock.now();
    let record = LocationRecord {
        name: command.name.clone(),
        x: command.x,
        y: command.y,
        created_at: now,
        updated_at: now,
    };
    locations.insert_location(&record).await?;

    info!(
        correlation_id = %command.correlation_id(),
        location = %record.name,
        "location created"
    );
    Ok(record)
}

/// Handles the `UpdateLocation` command: rewrites the row, then re-points
/// every member of the old membership set at the new name and deletes the
/// old set.
///
/// When the name does not change only the row is rewritten.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no row has the current name,
/// `DomainError::DuplicateIdentity` if the new name is taken, and store
/// errors as they occur. A store error part way through the member walk
/// leaves the members handled so far migrated and the rest in the old set.
pub async fn handle_update_location(
    command: &UpdateLocation,
    clock: &dyn Clock,
    locations: &dyn LocationRepository,
    store: &dyn EphemeralStore,
    locks: &IdentityLocks,
) -> Result<LocationUpdate, DomainError> {
    require_name(&command.name)?;

    let old = command.current_name.as_str();
    let new = command.name.as_str();
    let renamed = old != new;

    let _guard = locks
        .acquire([LockKey::location(old), LockKey::location(new)])
        .await?;

    if renamed && locations.count_locations(new).await? != 0 {
        return Err(DomainError::DuplicateIdentity {
            entity: EntityKind::Location,
            id: new.to_owned(),
        });
    }

    let location = locations
        .update_location(old, new, command.x, command.y, clock.now())
        .await?
        .ok_or_else(|| DomainError::location_not_found(old))?;

    if !renamed {
        return Ok(LocationUpdate {
            location,
            cascade: CascadeReport::default(),
        });
    }

    let ledger = PositionLedger::new(store);
    let mut cascade = CascadeReport::default();

    for member in ledger.members(old).await? {
        let Some(live) = live_member(&ledger, &member, old, &mut cascade).await? else {
            continue;
        };

        let moved = Position {
            location: new.to_owned(),
            ..live.position
        };
        ledger.place(&live.username, &moved).await?;
        ledger
            .join(&PlayerPosition::new(live.username, moved))
            .await?;
        cascade.applied += 1;
    }

    ledger.drop_membership(old).await?;

    info!(
        correlation_id = %command.correlation_id(),
        from = old,
        to = new,
        applied = cascade.applied,
        skipped = cascade.skipped,
        stale = cascade.stale,
        "location renamed"
    );
    Ok(LocationUpdate { location, cascade })
}

/// Handles the `DeleteLocation` command: deletes the row, then every
/// member's position, then the membership set.
///
/// Players who were in the location end up with no position.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no row was deleted, and store errors
/// as they occur.
pub async fn handle_delete_location(
    command: &DeleteLocation,
    locations: &dyn LocationRepository,
    store: &dyn EphemeralStore,
    locks: &IdentityLocks,
) -> Result<CascadeReport, DomainError> {
    let name = command.name.as_str();
    let _guard = locks.acquire([LockKey::location(name)]).await?;

    if locations.delete_location(name).await? == 0 {
        warn!(
            correlation_id = %command.correlation_id(),
            location = name,
            "location does not exist"
        );
        return Err(DomainError::location_not_found(name));
    }

    let ledger = PositionLedger::new(store);
    let mut cascade = CascadeReport::default();

    for member in ledger.members(name).await? {
        let Some(live) = live_member(&ledger, &member, name, &mut cascade).await? else {
            continue;
        };
        ledger.clear(&live.username).await?;
        cascade.applied += 1;
    }

    ledger.drop_membership(name).await?;

    info!(
        correlation_id = %command.correlation_id(),
        location = name,
        applied = cascade.applied,
        skipped = cascade.skipped,
        stale = cascade.stale,
        "location deleted"
    );
    Ok(cascade)
}

/// Decodes a membership token and pairs the player with their live position,
/// provided that position still names `location`. Anything else is counted
/// in `cascade` and yields `None`.
async fn live_member(
    ledger: &PositionLedger<'_>,
    member: &str,
    location: &str,
    cascade: &mut CascadeReport,
) -> Result<Option<PlayerPosition>, DomainError> {
    let entry = match PlayerPosition::decode(member) {
        Ok(entry) => entry,
        Err(err) => {
            warn!(location, member, error = %err, "skipping undecodable member");
            cascade.skipped += 1;
            return Ok(None);
        }
    };

    match ledger.position_of(&entry.username).await {
        Ok(Some(position)) if position.location == location => {
            Ok(Some(PlayerPosition::new(entry.username, position)))
        }
        Ok(_) => {
            debug!(location, username = %entry.username, "member no longer here");
            cascade.stale += 1;
            Ok(None)
        }
        Err(DomainError::Internal(msg)) => {
            warn!(location, username = %entry.username, error = %msg, "skipping member with undecodable position");
            cascade.skipped += 1;
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

//! Locking a player together with the location they stand in.

use tracing::debug;
use wayfarer_core::ephemeral::PositionLedger;
use wayfarer_core::error::DomainError;
use wayfarer_core::lock::{IdentityGuard, IdentityLocks, LockKey};
use wayfarer_core::position::Position;

const ATTEMPTS: usize = 3;

/// Locks `username`, their current location and `extra`, then returns the
/// position as read under the locks.
///
/// The location to lock is only known after reading the position, and it
/// can change between that read and the acquisition. The position is read
/// again once the locks are held; if it names a different location the
/// locks are released and the sequence repeats.
pub(crate) async fn lock_player_in_place<'l>(
    locks: &'l IdentityLocks,
    ledger: &PositionLedger<'_>,
    username: &str,
    extra: Option<LockKey>,
) -> Result<(IdentityGuard<'l>, Option<Position>), DomainError> {
    let mut observed = ledger.position_of(username).await?;

    for attempt in 1..=ATTEMPTS {
        let mut keys = vec![LockKey::player(username)];
        keys.extend(extra.clone());
        if let Some(position) = &observed {
            keys.push(LockKey::location(position.location.clone()));
        }

        let guard = locks.acquire(keys).await?;
        let current = ledger.position_of(username).await?;

        let before = observed.as_ref().map(|p| p.location.as_str());
        let after = current.as_ref().map(|p| p.location.as_str());
        if before == after {
            return Ok((guard, current));
        }

        debug!(username, attempt, ?before, ?after, "location changed while locking");
        drop(guard);
        observed = current;
    }

    Err(DomainError::Conflict(format!(
        "location of player {username:?} kept changing"
    )))
}

//! Per-identity locks.
//!
//! Travel, Move and the cascades each make several independent store round
//! trips. Holding the locks for every player and location an operation
//! touches makes those sequences mutually exclusive within this process.
//!
//! Keys are sorted before acquisition (all locations, then all players), so
//! any two operations take their common locks in the same order.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::warn;

use crate::error::DomainError;

/// An identity that can be locked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    /// A location, by name.
    Location(String),
    /// A player, by username.
    Player(String),
}

impl LockKey {
    /// Lock key for a player.
    pub fn player(username: impl Into<String>) -> Self {
        Self::Player(username.into())
    }

    /// Lock key for a location.
    pub fn location(name: impl Into<String>) -> Self {
        Self::Location(name.into())
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(name) => write!(f, "location {name:?}"),
            Self::Player(username) => write!(f, "player {username:?}"),
        }
    }
}

type Slot = Arc<AsyncMutex<()>>;

/// Registry of identity locks.
#[derive(Debug)]
pub struct IdentityLocks {
    slots: Mutex<HashMap<LockKey, Slot>>,
    wait: Duration,
}

impl IdentityLocks {
    /// Creates a registry whose acquisitions give up after `wait`.
    #[must_use]
    pub fn new(wait: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            wait,
        }
    }

    /// Acquires every key in `keys`, blocking until all are held.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` if any key stays held by another
    /// operation for longer than the configured wait. Keys acquired before
    /// the timeout are released.
    pub async fn acquire(
        &self,
        keys: impl IntoIterator<Item = LockKey>,
    ) -> Result<IdentityGuard<'_>, DomainError> {
        let mut keys: Vec<LockKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in &keys {
            let slot = self.slot(key);
            if let Ok(guard) = tokio::time::timeout(self.wait, slot.lock_owned()).await {
                guards.push(guard);
            } else {
                warn!(%key, wait_ms = self.wait.as_millis(), "identity lock wait exceeded");
                drop(guards);
                self.prune(&keys);
                return Err(DomainError::Conflict(format!(
                    "{key} is busy; gave up after {}ms",
                    self.wait.as_millis()
                )));
            }
        }

        Ok(IdentityGuard {
            locks: self,
            keys,
            guards,
        })
    }

    fn slot(&self, key: &LockKey) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Drops registry entries nobody holds or waits on.
    fn prune(&self, keys: &[LockKey]) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            if slots.get(key).is_some_and(|slot| Arc::strong_count(slot) == 1) {
                slots.remove(key);
            }
        }
    }

    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Holds a set of identity locks until dropped.
#[derive(Debug)]
pub struct IdentityGuard<'a> {
    locks: &'a IdentityLocks,
    keys: Vec<LockKey>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl IdentityGuard<'_> {
    #[cfg(test)]
    fn keys(&self) -> &[LockKey] {
        &self.keys
    }
}

impl Drop for IdentityGuard<'_> {
    fn drop(&mut self) {
        self.guards.clear();
        self.locks.prune(&self.keys);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_acquire_sorts_and_dedups_keys() {
        let locks = IdentityLocks::new(Duration::from_millis(50));

        let guard = locks
            .acquire([
                LockKey::player("alice"),
                LockKey::location("village"),
                LockKey::location("town"),
                LockKey::player("alice"),
            ])
            .await
            .unwrap();

        assert_eq!(
            guard.keys(),
            &[
                LockKey::location("town"),
                LockKey::location("village"),
                LockKey::player("alice"),
            ]
        );
    }

    #[tokio::test]
    async fn test_overlapping_acquisition_times_out_with_conflict() {
        let locks = IdentityLocks::new(Duration::from_millis(20));
        let _held = locks.acquire([LockKey::player("alice")]).await.unwrap();

        let result = locks
            .acquire([LockKey::location("town"), LockKey::player("alice")])
            .await;

        match result {
            Err(DomainError::Conflict(msg)) => assert!(msg.contains("alice")),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disjoint_keys_do_not_block() {
        let locks = IdentityLocks::new(Duration::from_millis(20));
        let _alice = locks.acquire([LockKey::player("alice")]).await.unwrap();

        let bob = locks.acquire([LockKey::player("bob")]).await;

        assert!(bob.is_ok());
    }

    #[tokio::test]
    async fn test_release_prunes_registry() {
        let locks = IdentityLocks::new(Duration::from_millis(20));
        {
            let _guard = locks
                .acquire([LockKey::player("alice"), LockKey::location("town")])
                .await
                .unwrap();
            assert_eq!(locks.slot_count(), 2);
        }
        assert_eq!(locks.slot_count(), 0);
    }

    #[tokio::test]
    async fn test_holders_run_one_at_a_time() {
        let locks = Arc::new(IdentityLocks::new(Duration::from_secs(5)));
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            let peak = Arc::clone(&peak);
            tasks.push(tokio::spawn(async move {
                let _guard = locks.acquire([LockKey::player("alice")]).await.unwrap();
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }
}

//! Test ephemeral stores: in-memory `EphemeralStore` implementations.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use wayfarer_core::error::DomainError;
use wayfarer_core::ephemeral::EphemeralStore;

/// Names a store call so a test can make it fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `get`
    Get,
    /// `set_with_ttl`
    SetWithTtl,
    /// `delete`
    Delete,
    /// `exists`
    Exists,
    /// `set_add`
    SetAdd,
    /// `set_remove`
    SetRemove,
    /// `set_members`
    SetMembers,
}

#[derive(Debug, Default)]
struct State {
    values: HashMap<String, (String, Duration)>,
    sets: HashMap<String, BTreeSet<String>>,
    fail_once: HashSet<StoreOp>,
}

impl State {
    fn check(&mut self, op: StoreOp) -> Result<(), DomainError> {
        if self.fail_once.remove(&op) {
            return Err(DomainError::StoreOperation(format!("injected {op:?} failure")));
        }
        Ok(())
    }
}

/// An ephemeral store held in process memory.
///
/// Mirrors the keyed-store semantics the Redis adapter relies on: a key is
/// either a string or a set, deleting works for both, and a set whose last
/// member is removed disappears. Expiry is recorded, not enforced; call
/// [`InMemoryEphemeralStore::expire`] to simulate it.
#[derive(Debug, Default)]
pub struct InMemoryEphemeralStore {
    state: Mutex<State>,
}

impl InMemoryEphemeralStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call of `op` fail with `StoreOperation`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_next(&self, op: StoreOp) {
        self.state.lock().unwrap().fail_once.insert(op);
    }

    /// Drops a string key as if its expiry had passed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn expire(&self, key: &str) {
        self.state.lock().unwrap().values.remove(key);
    }

    /// The raw string value under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .values
            .get(key)
            .map(|(v, _)| v.clone())
    }

    /// The expiry last written for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.state
            .lock()
            .unwrap()
            .values
            .get(key)
            .map(|(_, ttl)| *ttl)
    }

    /// Sorted members of the set under `key`; empty if absent.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn members(&self, key: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .sets
            .get(key)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether any string or set lives under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.values.contains_key(key) || state.sets.contains_key(key)
    }

    /// Writes a raw string value, bypassing the codec.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn put_value(&self, key: &str, value: &str, ttl: Duration) {
        self.state
            .lock()
            .unwrap()
            .values
            .insert(key.to_owned(), (value.to_owned(), ttl));
    }

    /// Adds a raw set member, bypassing the codec.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn put_member(&self, key: &str, member: &str) {
        self.state
            .lock()
            .unwrap()
            .sets
            .entry(key.to_owned())
            .or_default()
            .insert(member.to_owned());
    }
}

#[async_trait]
impl EphemeralStore for InMemoryEphemeralStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.check(StoreOp::Get)?;
        Ok(state.values.get(key).map(|(v, _)| v.clone()))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        state.check(StoreOp::SetWithTtl)?;
        state.sets.remove(key);
        state
            .values
            .insert(key.to_owned(), (value.to_owned(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.check(StoreOp::Delete)?;
        let had_value = state.values.remove(key).is_some();
        let had_set = state.sets.remove(key).is_some();
        Ok(had_value || had_set)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.check(StoreOp::Exists)?;
        Ok(state.values.contains_key(key) || state.sets.contains_key(key))
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.check(StoreOp::SetAdd)?;
        if state.values.contains_key(key) {
            return Err(DomainError::StoreOperation(format!(
                "WRONGTYPE {key} holds a string"
            )));
        }
        Ok(state
            .sets
            .entry(key.to_owned())
            .or_default()
            .insert(member.to_owned()))
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.check(StoreOp::SetRemove)?;
        let Some(set) = state.sets.get_mut(key) else {
            return Ok(false);
        };
        let removed = set.remove(member);
        if set.is_empty() {
            state.sets.remove(key);
        }
        Ok(removed)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.check(StoreOp::SetMembers)?;
        Ok(state
            .sets
            .get(key)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default())
    }
}

/// An ephemeral store whose every call fails with a connection error.
#[derive(Debug)]
pub struct FailingEphemeralStore;

#[async_trait]
impl EphemeralStore for FailingEphemeralStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(unreachable_store())
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), DomainError> {
        Err(unreachable_store())
    }

    async fn delete(&self, _key: &str) -> Result<bool, DomainError> {
        Err(unreachable_store())
    }

    async fn exists(&self, _key: &str) -> Result<bool, DomainError> {
        Err(unreachable_store())
    }

    async fn set_add(&self, _key: &str, _member: &str) -> Result<bool, DomainError> {
        Err(unreachable_store())
    }

    async fn set_remove(&self, _key: &str, _member: &str) -> Result<bool, DomainError> {
        Err(unreachable_store())
    }

    async fn set_members(&self, _key: &str) -> Result<Vec<String>, DomainError> {
        Err(unreachable_store())
    }
}

fn unreachable_store() -> DomainError {
    DomainError::StoreConnection("ephemeral store unreachable".into())
}

//! Test repositories: in-memory durable store implementations.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use wayfarer_core::error::{DomainError, EntityKind};
use wayfarer_core::model::{LocationRecord, PlayerRecord};
use wayfarer_core::repository::{LocationRepository, PlayerRepository};

/// A player repository backed by a `BTreeMap`. Enforces the primary key on
/// insert the way the relational store does.
#[derive(Debug, Default)]
pub struct InMemoryPlayerRepository {
    rows: Mutex<BTreeMap<String, PlayerRecord>>,
}

impl InMemoryPlayerRepository {
    /// An empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository preloaded with `records`.
    #[must_use]
    pub fn with_players(records: impl IntoIterator<Item = PlayerRecord>) -> Self {
        let rows = records
            .into_iter()
            .map(|r| (r.username.clone(), r))
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Returns a copy of the row for `username`, if present.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn row(&self, username: &str) -> Option<PlayerRecord> {
        self.rows.lock().unwrap().get(username).cloned()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn count_players(&self, username: &str) -> Result<u64, DomainError> {
        Ok(u64::from(self.rows.lock().unwrap().contains_key(username)))
    }

    async fn insert_player(&self, record: &PlayerRecord) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&record.username) {
            return Err(DomainError::DuplicateIdentity {
                entity: EntityKind::Player,
                id: record.username.clone(),
            });
        }
        rows.insert(record.username.clone(), record.clone());
        Ok(())
    }

    async fn find_player(&self, username: &str) -> Result<Option<PlayerRecord>, DomainError> {
        Ok(self.row(username))
    }

    async fn list_players(&self) -> Result<Vec<PlayerRecord>, DomainError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<PlayerRecord>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(username).map(|row| {
            password_hash.clone_into(&mut row.password_hash);
            row.updated_at = updated_at;
            row.clone()
        }))
    }

    async fn delete_player(&self, username: &str) -> Result<u64, DomainError> {
        Ok(u64::from(self.rows.lock().unwrap().remove(username).is_some()))
    }
}

/// A location repository backed by a `BTreeMap`.
#[derive(Debug, Default)]
pub struct InMemoryLocationRepository {
    rows: Mutex<BTreeMap<String, LocationRecord>>,
}

impl InMemoryLocationRepository {
    /// An empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository preloaded with `records`.
    #[must_use]
    pub fn with_locations(records: impl IntoIterator<Item = LocationRecord>) -> Self {
        let rows = records.into_iter().map(|r| (r.name.clone(), r)).collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Returns a copy of the row for `name`, if present.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn row(&self, name: &str) -> Option<LocationRecord> {
        self.rows.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn count_locations(&self, name: &str) -> Result<u64, DomainError> {
        Ok(u64::from(self.rows.lock().unwrap().contains_key(name)))
    }

    async fn insert_location(&self, record: &LocationRecord) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&record.name) {
            return Err(DomainError::DuplicateIdentity {
                entity: EntityKind::Location,
                id: record.name.clone(),
            });
        }
        rows.insert(record.name.clone(), record.clone());
        Ok(())
    }

    async fn find_location(&self, name: &str) -> Result<Option<LocationRecord>, DomainError> {
        Ok(self.row(name))
    }

    async fn list_locations(&self) -> Result<Vec<LocationRecord>, DomainError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn update_location(
        &self,
        current_name: &str,
        name: &str,
        x: i32,
        y: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<LocationRecord>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(current_name) {
            return Ok(None);
        }
        if name != current_name && rows.contains_key(name) {
            return Err(DomainError::DuplicateIdentity {
                entity: EntityKind::Location,
                id: name.to_owned(),
            });
        }
        let Some(mut row) = rows.remove(current_name) else {
            return Ok(None);
        };
        name.clone_into(&mut row.name);
        row.x = x;
        row.y = y;
        row.updated_at = updated_at;
        rows.insert(row.name.clone(), row.clone());
        Ok(Some(row))
    }

    async fn delete_location(&self, name: &str) -> Result<u64, DomainError> {
        Ok(u64::from(self.rows.lock().unwrap().remove(name).is_some()))
    }
}

/// A player repository whose every call fails with a connection error.
#[derive(Debug)]
pub struct FailingPlayerRepository;

#[async_trait]
impl PlayerRepository for FailingPlayerRepository {
    async fn count_players(&self, _username: &str) -> Result<u64, DomainError> {
        Err(refused())
    }

    async fn insert_player(&self, _record: &PlayerRecord) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn find_player(&self, _username: &str) -> Result<Option<PlayerRecord>, DomainError> {
        Err(refused())
    }

    async fn list_players(&self) -> Result<Vec<PlayerRecord>, DomainError> {
        Err(refused())
    }

    async fn update_password(
        &self,
        _username: &str,
        _password_hash: &str,
        _updated_at: DateTime<Utc>,
    ) -> Result<Option<PlayerRecord>, DomainError> {
        Err(refused())
    }

    async fn delete_player(&self, _username: &str) -> Result<u64, DomainError> {
        Err(refused())
    }
}

/// A location repository whose every call fails with a connection error.
#[derive(Debug)]
pub struct FailingLocationRepository;

#[async_trait]
impl LocationRepository for FailingLocationRepository {
    async fn count_locations(&self, _name: &str) -> Result<u64, DomainError> {
        Err(refused())
    }

    async fn insert_location(&self, _record: &LocationRecord) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn find_location(&self, _name: &str) -> Result<Option<LocationRecord>, DomainError> {
        Err(refused())
    }

    async fn list_locations(&self) -> Result<Vec<LocationRecord>, DomainError> {
        Err(refused())
    }

    async fn update_location(
        &self,
        _current_name: &str,
        _name: &str,
        _x: i32,
        _y: i32,
        _updated_at: DateTime<Utc>,
    ) -> Result<Option<LocationRecord>, DomainError> {
        Err(refused())
    }

    async fn delete_location(&self, _name: &str) -> Result<u64, DomainError> {
        Err(refused())
    }
}

fn refused() -> DomainError {
    DomainError::StoreConnection("connection refused".into())
}

//! Durable store abstractions.
//!
//! The relational store is the system of record for player and location
//! identity. Implementations report `rows affected` as-is; turning a zero
//! into `NotFound` is the caller's decision.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::model::{LocationRecord, PlayerRecord};

/// Repository for player rows.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Count rows with this username (0 or 1).
    async fn count_players(&self, username: &str) -> Result<u64, DomainError>;

    /// Insert a new row. A primary key collision is `DuplicateIdentity`.
    async fn insert_player(&self, record: &PlayerRecord) -> Result<(), DomainError>;

    /// Fetch a row by username.
    async fn find_player(&self, username: &str) -> Result<Option<PlayerRecord>, DomainError>;

    /// Fetch every row, ordered by username.
    async fn list_players(&self) -> Result<Vec<PlayerRecord>, DomainError>;

    /// Replace the password hash, returning the updated row if it exists.
    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<PlayerRecord>, DomainError>;

    /// Delete a row, returning the number of rows affected.
    async fn delete_player(&self, username: &str) -> Result<u64, DomainError>;
}

/// Repository for location rows.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Count rows with this name (0 or 1).
    async fn count_locations(&self, name: &str) -> Result<u64, DomainError>;

    /// Insert a new row. A primary key collision is `DuplicateIdentity`.
    async fn insert_location(&self, record: &LocationRecord) -> Result<(), DomainError>;

    /// Fetch a row by name.
    async fn find_location(&self, name: &str) -> Result<Option<LocationRecord>, DomainError>;

    /// Fetch every row, ordered by name.
    async fn list_locations(&self) -> Result<Vec<LocationRecord>, DomainError>;

    /// Rewrite the row named `current_name` with a new name and coordinates.
    /// Returns the updated row, or `None` when no row matched.
    async fn update_location(
        &self,
        current_name: &str,
        name: &str,
        x: i32,
        y: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<LocationRecord>, DomainError>;

    /// Delete a row, returning the number of rows affected.
    async fn delete_location(&self, name: &str) -> Result<u64, DomainError>;
}

//! Ephemeral store abstractions.
//!
//! The ephemeral store is a keyed store with string values, per-key expiry
//! and unordered string sets. Two key families live in it:
//!
//! - `<username>:position` holds the player's encoded [`Position`] with a
//!   48 hour expiry.
//! - `location:<name>` is the membership set of the location: one encoded
//!   [`PlayerPosition`] per player whose position names it.
//!
//! [`PositionLedger`] is the typed accessor the command handlers use; it is
//! the only code that builds keys or encodes values.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::DomainError;
use crate::position::{PlayerPosition, Position};

/// How long a position lives without being refreshed by travel or movement.
pub const POSITION_TTL: Duration = Duration::from_secs(48 * 60 * 60);

/// Raw keyed/set store operations.
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Read a string value.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Write a string value, replacing any previous value and expiry.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration)
    -> Result<(), DomainError>;

    /// Delete a key of any type. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Whether a key of any type exists.
    async fn exists(&self, key: &str) -> Result<bool, DomainError>;

    /// Add a member to a set. Returns whether it was newly added.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError>;

    /// Remove an exact member from a set. Returns whether it was present.
    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, DomainError>;

    /// All members of a set, in no particular order.
    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError>;
}

/// Key holding a player's position.
#[must_use]
pub fn position_key(username: &str) -> String {
    format!("{username}:position")
}

/// Key holding a location's membership set.
#[must_use]
pub fn membership_key(location: &str) -> String {
    format!("location:{location}")
}

/// Typed view over an [`EphemeralStore`].
#[derive(Clone, Copy)]
pub struct PositionLedger<'a> {
    store: &'a dyn EphemeralStore,
}

impl<'a> PositionLedger<'a> {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: &'a dyn EphemeralStore) -> Self {
        Self { store }
    }

    /// The player's live position, if any.
    ///
    /// # Errors
    ///
    /// Store failures pass through; an undecodable value is `Internal`.
    pub async fn position_of(&self, username: &str) -> Result<Option<Position>, DomainError> {
        let Some(token) = self.store.get(&position_key(username)).await? else {
            debug!(username, "no live position");
            return Ok(None);
        };
        Ok(Some(Position::decode(&token)?))
    }

    /// Writes the player's position with a fresh expiry.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn place(&self, username: &str, position: &Position) -> Result<(), DomainError> {
        self.store
            .set_with_ttl(&position_key(username), &position.encode(), POSITION_TTL)
            .await
    }

    /// Removes the player's position.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn clear(&self, username: &str) -> Result<bool, DomainError> {
        self.store.delete(&position_key(username)).await
    }

    /// Adds `entry` to the membership set of the location it names.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn join(&self, entry: &PlayerPosition) -> Result<bool, DomainError> {
        self.store
            .set_add(&membership_key(&entry.position.location), &entry.encode())
            .await
    }

    /// Removes `entry` from the membership set of the location it names.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn leave(&self, entry: &PlayerPosition) -> Result<bool, DomainError> {
        self.store
            .set_remove(&membership_key(&entry.position.location), &entry.encode())
            .await
    }

    /// Raw membership tokens of a location. Decoding is left to the caller,
    /// which decides whether a bad token is fatal.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn members(&self, location: &str) -> Result<Vec<String>, DomainError> {
        self.store.set_members(&membership_key(location)).await
    }

    /// Deletes a location's membership set.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn drop_membership(&self, location: &str) -> Result<bool, DomainError> {
        self.store.delete(&membership_key(location)).await
    }
}

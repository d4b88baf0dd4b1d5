//! Domain error types.

use std::fmt;

use thiserror::Error;

/// The kind of durable identity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A player, identified by username.
    Player,
    /// A location, identified by name.
    Location,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => f.write_str("player"),
            Self::Location => f.write_str("location"),
        }
    }
}

/// Top-level domain error type.
///
/// Every store-layer failure is folded into one of these kinds before it
/// leaves a store adapter; callers never see driver errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The durable or ephemeral store could not be reached, or a call to it
    /// exceeded its deadline.
    #[error("store connection error: {0}")]
    StoreConnection(String),

    /// A query or write was rejected by the store.
    #[error("store operation failed: {0}")]
    StoreOperation(String),

    /// The referenced player or location does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Which identity was looked up.
        entity: EntityKind,
        /// The identity value.
        id: String,
    },

    /// A player or location with this identity already exists.
    #[error("{entity} already exists: {id}")]
    DuplicateIdentity {
        /// Which identity collided.
        entity: EntityKind,
        /// The identity value.
        id: String,
    },

    /// The player has no live position.
    #[error("player is not in a location: {0}")]
    NotInLocation(String),

    /// Credentials or token did not check out.
    #[error("authentication failed")]
    AuthFailure,

    /// Encoding, decoding or hashing failed.
    #[error("internal error: {0}")]
    Internal(String),

    /// The requested operation is not supported.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),

    /// Request input was rejected before touching any store.
    #[error("validation error: {0}")]
    Validation(String),

    /// An identity lock could not be acquired in time.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    /// Shorthand for a player `NotFound`.
    pub fn player_not_found(username: impl Into<String>) -> Self {
        Self::NotFound {
            entity: EntityKind::Player,
            id: username.into(),
        }
    }

    /// Shorthand for a location `NotFound`.
    pub fn location_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            entity: EntityKind::Location,
            id: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        let err = DomainError::location_not_found("town");
        assert_eq!(err.to_string(), "location not found: town");
    }

    #[test]
    fn test_duplicate_message_names_entity_and_id() {
        let err = DomainError::DuplicateIdentity {
            entity: EntityKind::Player,
            id: "alice".to_owned(),
        };
        assert_eq!(err.to_string(), "player already exists: alice");
    }
}

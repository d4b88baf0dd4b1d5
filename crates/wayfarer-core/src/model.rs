//! Durable records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player row. `username` is the primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Unique username.
    pub username: String,
    /// Salted password digest; never serialized.
    pub password_hash: String,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A location row. `name` is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Unique location name.
    pub name: String,
    /// Origin x coordinate.
    pub x: i32,
    /// Origin y coordinate.
    pub y: i32,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

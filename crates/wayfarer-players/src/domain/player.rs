//! Read model for players.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wayfarer_core::model::PlayerRecord;
use wayfarer_core::position::Position;

/// A player as seen by callers: the durable row without its password hash,
/// plus the live position when the player is somewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// The player's username.
    pub username: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Live position, if any.
    pub position: Option<Position>,
}

impl PlayerView {
    /// Builds a view from a row and an optional position.
    #[must_use]
    pub fn from_record(record: PlayerRecord, position: Option<Position>) -> Self {
        Self {
            username: record.username,
            created_at: record.created_at,
            updated_at: record.updated_at,
            position,
        }
    }
}

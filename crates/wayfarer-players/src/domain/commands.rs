//! Commands for the Players context.

use uuid::Uuid;
use wayfarer_core::command::Command;

/// Command to register a new player.
#[derive(Debug, Clone)]
pub struct CreatePlayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requested username.
    pub username: String,
    /// The cleartext password; hashed before it reaches the store.
    pub password: String,
}

impl Command for CreatePlayer {
    fn command_type(&self) -> &'static str {
        "players.create_player"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.username
    }
}

/// Command to check a player's password and issue an auth token.
#[derive(Debug, Clone)]
pub struct AuthPlayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player's username.
    pub username: String,
    /// The cleartext password to check.
    pub password: String,
}

impl Command for AuthPlayer {
    fn command_type(&self) -> &'static str {
        "players.auth_player"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.username
    }
}

/// Command to change a player's details.
#[derive(Debug, Clone)]
pub struct UpdatePlayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player to update.
    pub username: String,
    /// A new username. Only `None` or the current username are accepted.
    pub new_username: Option<String>,
    /// A new cleartext password.
    pub password: Option<String>,
}

impl Command for UpdatePlayer {
    fn command_type(&self) -> &'static str {
        "players.update_player"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.username
    }
}

/// Command to delete a player and their live position.
#[derive(Debug, Clone)]
pub struct DeletePlayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player to delete.
    pub username: String,
}

impl Command for DeletePlayer {
    fn command_type(&self) -> &'static str {
        "players.delete_player"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.username
    }
}

/// Command to send a player to the origin of another location.
#[derive(Debug, Clone)]
pub struct Travel {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The travelling player.
    pub username: String,
    /// Name of the destination location.
    pub destination: String,
}

impl Command for Travel {
    fn command_type(&self) -> &'static str {
        "players.travel"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.username
    }
}

/// Command to change a player's offset within their current location.
#[derive(Debug, Clone)]
pub struct Move {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The moving player.
    pub username: String,
    /// New horizontal offset.
    pub x: i32,
    /// New vertical offset.
    pub y: i32,
}

impl Command for Move {
    fn command_type(&self) -> &'static str {
        "players.move"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.username
    }
}

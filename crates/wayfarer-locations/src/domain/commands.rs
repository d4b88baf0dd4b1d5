//! Commands for the Locations context.

use uuid::Uuid;
use wayfarer_core::command::Command;

/// Command to add a location to the world.
#[derive(Debug, Clone)]
pub struct CreateLocation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Unique location name.
    pub name: String,
    /// Origin x coordinate.
    pub x: i32,
    /// Origin y coordinate.
    pub y: i32,
}

impl Command for CreateLocation {
    fn command_type(&self) -> &'static str {
        "locations.create_location"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.name
    }
}

/// Command to rename and/or re-anchor a location.
#[derive(Debug, Clone)]
pub struct UpdateLocation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The location's current name.
    pub current_name: String,
    /// The name after the update; equal to `current_name` to keep it.
    pub name: String,
    /// New origin x coordinate.
    pub x: i32,
    /// New origin y coordinate.
    pub y: i32,
}

impl Command for UpdateLocation {
    fn command_type(&self) -> &'static str {
        "locations.update_location"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.current_name
    }
}

/// Command to remove a location, evicting everyone in it.
#[derive(Debug, Clone)]
pub struct DeleteLocation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The location to delete.
    pub name: String,
}

impl Command for DeleteLocation {
    fn command_type(&self) -> &'static str {
        "locations.delete_location"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn subject(&self) -> &str {
        &self.name
    }
}

//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name of the command, e.g. `players.travel`, for log fields.
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through both stores.
    fn correlation_id(&self) -> Uuid;

    /// The player username or location name the command acts on.
    fn subject(&self) -> &str;
}

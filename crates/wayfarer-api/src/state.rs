//! Shared application state.

use std::sync::Arc;

use wayfarer_core::clock::Clock;
use wayfarer_core::ephemeral::EphemeralStore;
use wayfarer_core::lock::IdentityLocks;
use wayfarer_core::repository::{LocationRepository, PlayerRepository};
use wayfarer_players::domain::credentials::AuthSettings;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Durable player rows.
    pub players: Arc<dyn PlayerRepository>,
    /// Durable location rows.
    pub locations: Arc<dyn LocationRepository>,
    /// Positions and membership sets.
    pub store: Arc<dyn EphemeralStore>,
    /// Per-identity locks shared by every command.
    pub locks: Arc<IdentityLocks>,
    /// Clock for timestamps and token expiry.
    pub clock: Arc<dyn Clock>,
    /// Token issuance settings.
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        locations: Arc<dyn LocationRepository>,
        store: Arc<dyn EphemeralStore>,
        locks: IdentityLocks,
        clock: Arc<dyn Clock>,
        auth: AuthSettings,
    ) -> Self {
        Self {
            players,
            locations,
            store,
            locks: Arc::new(locks),
            clock,
            auth: Arc::new(auth),
        }
    }
}

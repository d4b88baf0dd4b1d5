//! Test clock: pinned `Clock` for deterministic timestamps and expiry.

use chrono::{DateTime, TimeZone, Utc};
use wayfarer_core::clock::Clock;

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// 2026-01-15T10:00:00Z, the instant most tests pin to.
    ///
    /// # Panics
    ///
    /// Never; the literal date is valid.
    #[must_use]
    pub fn default_instant() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

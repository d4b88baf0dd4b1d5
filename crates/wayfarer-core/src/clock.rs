//! Wall-clock seam.
//!
//! Row timestamps and auth token expiry both read the time through this
//! trait so tests can pin it.

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the instant `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Internal` if the instant is not representable.
    fn after(&self, ttl: Duration) -> Result<DateTime<Utc>, DomainError> {
        self.now()
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::Internal(format!("{ttl} from now is out of range")))
    }
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

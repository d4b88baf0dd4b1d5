//! Per-call deadline for store round trips.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::DomainError;

/// Bounds every store call an adapter makes.
///
/// A call that runs past the deadline fails with
/// `DomainError::StoreConnection`. Nothing is rolled back: earlier writes of
/// the same operation stay committed.
#[derive(Debug, Clone, Copy)]
pub struct StoreDeadline {
    limit: Duration,
}

impl StoreDeadline {
    /// Deadline of `limit` per call.
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    /// Runs `call`, named `op` for logs, within the deadline.
    ///
    /// # Errors
    ///
    /// Returns the call's own error, or `StoreConnection` on timeout.
    pub async fn run<T, F>(&self, op: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        if let Ok(result) = tokio::time::timeout(self.limit, call).await {
            result
        } else {
            let limit_ms = self.limit.as_millis();
            warn!(op, limit_ms, "store call exceeded deadline");
            Err(DomainError::StoreConnection(format!(
                "{op} exceeded {limit_ms}ms deadline"
            )))
        }
    }
}

impl Default for StoreDeadline {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

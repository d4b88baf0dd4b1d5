//! Mapping of `sqlx` failures onto domain errors.

use tracing::warn;
use wayfarer_core::error::{DomainError, EntityKind};

/// Classifies a `sqlx` error. A unique violation becomes
/// `DuplicateIdentity` for `entity`/`id`; failures to reach the database
/// become `StoreConnection`; everything else is `StoreOperation`.
pub(crate) fn map_sqlx_error(err: sqlx::Error, entity: EntityKind, id: &str) -> DomainError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::DuplicateIdentity {
            entity,
            id: id.to_owned(),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            warn!(error = %err, "durable store unreachable");
            DomainError::StoreConnection(err.to_string())
        }
        other => DomainError::StoreOperation(other.to_string()),
    }
}

//! Redis implementation of the `EphemeralStore` trait.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::RedisError;
use redis::aio::ConnectionManager;
use tracing::{info, warn};

use wayfarer_core::deadline::StoreDeadline;
use wayfarer_core::ephemeral::EphemeralStore;
use wayfarer_core::error::DomainError;

/// Redis-backed ephemeral store.
///
/// Commands go through a shared [`ConnectionManager`], which reconnects on
/// its own after a dropped connection. Each command is bounded by a
/// [`StoreDeadline`].
#[derive(Clone)]
pub struct RedisEphemeralStore {
    manager: ConnectionManager,
    deadline: StoreDeadline,
}

impl RedisEphemeralStore {
    /// Connects to the Redis server at `url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreConnection` if the URL is invalid or the
    /// server cannot be reached within the deadline.
    pub async fn connect(url: &str, deadline: StoreDeadline) -> Result<Self, DomainError> {
        let client = redis::Client::open(url)
            .map_err(|e| DomainError::StoreConnection(format!("invalid ephemeral store url: {e}")))?;
        let manager = deadline
            .run("connect", async {
                ConnectionManager::new(client)
                    .await
                    .map_err(map_redis_error)
            })
            .await?;
        info!("connected to ephemeral store");
        Ok(Self { manager, deadline })
    }
}

impl std::fmt::Debug for RedisEphemeralStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEphemeralStore")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EphemeralStore for RedisEphemeralStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.manager.clone();
        self.deadline
            .run("get", async {
                let value: Option<String> = conn.get(key).await.map_err(map_redis_error)?;
                Ok(value)
            })
            .await
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let mut conn = self.manager.clone();
        self.deadline
            .run("set", async {
                let () = redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("EX")
                    .arg(ttl.as_secs().max(1))
                    .query_async(&mut conn)
                    .await
                    .map_err(map_redis_error)?;
                Ok(())
            })
            .await
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.manager.clone();
        self.deadline
            .run("del", async {
                let removed: u64 = conn.del(key).await.map_err(map_redis_error)?;
                Ok(removed > 0)
            })
            .await
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.manager.clone();
        self.deadline
            .run("exists", async {
                let found: bool = conn.exists(key).await.map_err(map_redis_error)?;
                Ok(found)
            })
            .await
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let mut conn = self.manager.clone();
        self.deadline
            .run("sadd", async {
                let added: u64 = conn.sadd(key, member).await.map_err(map_redis_error)?;
                Ok(added > 0)
            })
            .await
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let mut conn = self.manager.clone();
        self.deadline
            .run("srem", async {
                let removed: u64 = conn.srem(key, member).await.map_err(map_redis_error)?;
                Ok(removed > 0)
            })
            .await
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.manager.clone();
        self.deadline
            .run("smembers", async {
                let members: Vec<String> = conn.smembers(key).await.map_err(map_redis_error)?;
                Ok(members)
            })
            .await
    }
}

/// Failures to reach the server become `StoreConnection`; everything else,
/// such as a command against a key of the wrong type, is `StoreOperation`.
fn map_redis_error(err: RedisError) -> DomainError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_timeout()
        || err.is_connection_dropped()
    {
        warn!(error = %err, "ephemeral store unreachable");
        DomainError::StoreConnection(err.to_string())
    } else {
        DomainError::StoreOperation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use redis::ErrorKind;

    use super::*;

    #[test]
    fn test_io_error_maps_to_store_connection() {
        let err = RedisError::from((ErrorKind::IoError, "broken pipe"));

        assert!(matches!(
            map_redis_error(err),
            DomainError::StoreConnection(_)
        ));
    }

    #[test]
    fn test_wrong_type_maps_to_store_operation() {
        let err = RedisError::from((
            ErrorKind::TypeError,
            "WRONGTYPE Operation against a key holding the wrong kind of value",
        ));

        assert!(matches!(
            map_redis_error(err),
            DomainError::StoreOperation(_)
        ));
    }

    #[tokio::test]
    async fn test_connect_with_invalid_url_is_store_connection() {
        let result = RedisEphemeralStore::connect("not-a-url", StoreDeadline::default()).await;

        match result {
            Err(DomainError::StoreConnection(msg)) => {
                assert!(msg.starts_with("invalid ephemeral store url"));
            }
            other => panic!("expected StoreConnection, got {other:?}"),
        }
    }
}

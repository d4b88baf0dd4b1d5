//! `PostgreSQL` implementation of the `PlayerRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use wayfarer_core::deadline::StoreDeadline;
use wayfarer_core::error::{DomainError, EntityKind};
use wayfarer_core::model::PlayerRecord;
use wayfarer_core::repository::PlayerRepository;

use crate::error::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct PlayerRow {
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlayerRow> for PlayerRecord {
    fn from(row: PlayerRow) -> Self {
        Self {
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed player repository.
#[derive(Debug, Clone)]
pub struct PgPlayerRepository {
    pool: PgPool,
    deadline: StoreDeadline,
}

impl PgPlayerRepository {
    /// Creates a new `PgPlayerRepository` with the default per-call deadline.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_deadline(pool, StoreDeadline::default())
    }

    /// Creates a new `PgPlayerRepository` bounding each query by `deadline`.
    #[must_use]
    pub fn with_deadline(pool: PgPool, deadline: StoreDeadline) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl PlayerRepository for PgPlayerRepository {
    async fn count_players(&self, username: &str) -> Result<u64, DomainError> {
        let count: i64 = self
            .deadline
            .run("count_players", async {
                sqlx::query_scalar("SELECT COUNT(*) FROM player WHERE username = $1")
                    .bind(username)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, EntityKind::Player, username))
            })
            .await?;
        Ok(count.unsigned_abs())
    }

    async fn insert_player(&self, record: &PlayerRecord) -> Result<(), DomainError> {
        self.deadline
            .run("insert_player", async {
                sqlx::query(
                    "INSERT INTO player (username, password_hash, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(&record.username)
                .bind(&record.password_hash)
                .bind(record.created_at)
                .bind(record.updated_at)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, EntityKind::Player, &record.username))
            })
            .await?;
        Ok(())
    }

    async fn find_player(&self, username: &str) -> Result<Option<PlayerRecord>, DomainError> {
        let row: Option<PlayerRow> = self
            .deadline
            .run("find_player", async {
                sqlx::query_as(
                    "SELECT username, password_hash, created_at, updated_at \
                     FROM player WHERE username = $1",
                )
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, EntityKind::Player, username))
            })
            .await?;
        Ok(row.map(PlayerRecord::from))
    }

    async fn list_players(&self) -> Result<Vec<PlayerRecord>, DomainError> {
        let rows: Vec<PlayerRow> = self
            .deadline
            .run("list_players", async {
                sqlx::query_as(
                    "SELECT username, password_hash, created_at, updated_at \
                     FROM player ORDER BY username",
                )
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, EntityKind::Player, ""))
            })
            .await?;
        Ok(rows.into_iter().map(PlayerRecord::from).collect())
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<PlayerRecord>, DomainError> {
        let row: Option<PlayerRow> = self
            .deadline
            .run("update_password", async {
                sqlx::query_as(
                    "UPDATE player SET password_hash = $2, updated_at = $3 \
                     WHERE username = $1 \
                     RETURNING username, password_hash, created_at, updated_at",
                )
                .bind(username)
                .bind(password_hash)
                .bind(updated_at)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, EntityKind::Player, username))
            })
            .await?;
        Ok(row.map(PlayerRecord::from))
    }

    async fn delete_player(&self, username: &str) -> Result<u64, DomainError> {
        let result = self
            .deadline
            .run("delete_player", async {
                sqlx::query("DELETE FROM player WHERE username = $1")
                    .bind(username)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, EntityKind::Player, username))
            })
            .await?;
        Ok(result.rows_affected())
    }
}

//! `PostgreSQL` implementation of the `LocationRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use wayfarer_core::deadline::StoreDeadline;
use wayfarer_core::error::{DomainError, EntityKind};
use wayfarer_core::model::LocationRecord;
use wayfarer_core::repository::LocationRepository;

use crate::error::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct LocationRow {
    name: String,
    x: i32,
    y: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LocationRow> for LocationRecord {
    fn from(row: LocationRow) -> Self {
        Self {
            name: row.name,
            x: row.x,
            y: row.y,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed location repository.
#[derive(Debug, Clone)]
pub struct PgLocationRepository {
    pool: PgPool,
    deadline: StoreDeadline,
}

impl PgLocationRepository {
    /// Creates a new `PgLocationRepository` with the default per-call deadline.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_deadline(pool, StoreDeadline::default())
    }

    /// Creates a new `PgLocationRepository` bounding each query by `deadline`.
    #[must_use]
    pub fn with_deadline(pool: PgPool, deadline: StoreDeadline) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    async fn count_locations(&self, name: &str) -> Result<u64, DomainError> {
        let count: i64 = self
            .deadline
            .run("count_locations", async {
                sqlx::query_scalar("SELECT COUNT(*) FROM location WHERE name = $1")
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, EntityKind::Location, name))
            })
            .await?;
        Ok(count.unsigned_abs())
    }

    async fn insert_location(&self, record: &LocationRecord) -> Result<(), DomainError> {
        self.deadline
            .run("insert_location", async {
                sqlx::query(
                    "INSERT INTO location (name, x, y, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(&record.name)
                .bind(record.x)
                .bind(record.y)
                .bind(record.created_at)
                .bind(record.updated_at)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, EntityKind::Location, &record.name))
            })
            .await?;
        Ok(())
    }

    async fn find_location(&self, name: &str) -> Result<Option<LocationRecord>, DomainError> {
        let row: Option<LocationRow> = self
            .deadline
            .run("find_location", async {
                sqlx::query_as(
                    "SELECT name, x, y, created_at, updated_at FROM location WHERE name = $1",
                )
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, EntityKind::Location, name))
            })
            .await?;
        Ok(row.map(LocationRecord::from))
    }

    async fn list_locations(&self) -> Result<Vec<LocationRecord>, DomainError> {
        let rows: Vec<LocationRow> = self
            .deadline
            .run("list_locations", async {
                sqlx::query_as(
                    "SELECT name, x, y, created_at, updated_at FROM location ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, EntityKind::Location, ""))
            })
            .await?;
        Ok(rows.into_iter().map(LocationRecord::from).collect())
    }

    async fn update_location(
        &self,
        current_name: &str,
        name: &str,
        x: i32,
        y: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<LocationRecord>, DomainError> {
        let row: Option<LocationRow> = self
            .deadline
            .run("update_location", async {
                sqlx::query_as(
                    "UPDATE location SET name = $2, x = $3, y = $4, updated_at = $5 \
                     WHERE name = $1 \
                     RETURNING name, x, y, created_at, updated_at",
                )
                .bind(current_name)
                .bind(name)
                .bind(x)
                .bind(y)
                .bind(updated_at)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, EntityKind::Location, name))
            })
            .await?;
        Ok(row.map(LocationRecord::from))
    }

    async fn delete_location(&self, name: &str) -> Result<u64, DomainError> {
        let result = self
            .deadline
            .run("delete_location", async {
                sqlx::query("DELETE FROM location WHERE name = $1")
                    .bind(name)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, EntityKind::Location, name))
            })
            .await?;
        Ok(result.rows_affected())
    }
}

//! Embedded schema migrations.

use sqlx::migrate::Migrator;

/// Migrations from the workspace `migrations/` directory, applied at startup.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

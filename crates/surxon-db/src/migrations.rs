//! # Schema Migrations
//!
//! The catalog schema ships inside the binary; `sqlx::migrate!` embeds every
//! file under `migrations/sqlite/` at compile time and records applied
//! versions in `_sqlx_migrations`.
//!
//! ```text
//! 001_catalog.sql
//!   ├── categories   slug UNIQUE, (name, parent) UNIQUE, depth triggers
//!   ├── brands
//!   ├── products     code UNIQUE, category CASCADE, brand SET NULL,
//!   │                child-category triggers
//!   └── users        phone_number UNIQUE
//! ```
//!
//! Applied files are immutable. Schema changes go into a new
//! `NNN_description.sql` with the next sequence number.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every pending migration. Safe to call on an up-to-date database.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying catalog migrations");
    MIGRATOR.run(pool).await?;
    info!("Catalog schema is up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    // _sqlx_migrations is missing until the first run
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_status_before_and_after_run() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let (embedded, applied) = migration_status(db.pool()).await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(applied, 0);

        run_migrations(db.pool()).await.unwrap();
        run_migrations(db.pool()).await.unwrap();

        let (_, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(applied, embedded);
    }
}

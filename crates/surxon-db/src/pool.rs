//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  CatalogConfig::load(None)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from(&config) ← pool settings + catalog settings             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(db_config).await ← pool + migrations                     │
//! │       │                                                                 │
//! │       ├── db.categories()  ──┐                                          │
//! │       ├── db.products()    ──┼── each repository clones the pool        │
//! │       ├── db.brands()      ──┤   and a copy of CatalogSettings          │
//! │       └── db.users()       ──┘                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## SQLite Settings
//! File databases use WAL journaling with NORMAL synchronous. Foreign keys
//! are always on: cascades and `SET NULL` on brand deletion depend on them.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{CatalogConfig, CatalogSettings};
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::brand::BrandRepository;
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/surxon.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// `None` keeps idle connections open forever.
    pub idle_timeout: Option<Duration>,

    /// Default: true
    pub run_migrations: bool,

    /// Catalog behaviour handed to repositories.
    pub catalog: CatalogSettings,

    in_memory: bool,
}

impl DbConfig {
    /// Creates a configuration for a database file, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
            catalog: CatalogSettings::default(),
            in_memory: false,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Settings are clamped, since they can arrive without
    /// [`CatalogConfig::validate`] having run.
    pub fn catalog(mut self, catalog: CatalogSettings) -> Self {
        self.catalog = catalog.clamped();
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// The database lives as long as its single connection, so that
    /// connection is never reaped.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
            catalog: CatalogSettings::default(),
            in_memory: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            let connect_url = format!("sqlite://{}?mode=rwc", self.database_path.display());
            SqliteConnectOptions::from_str(&connect_url)
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        Ok(options.foreign_keys(true))
    }
}

impl From<&CatalogConfig> for DbConfig {
    fn from(config: &CatalogConfig) -> Self {
        DbConfig::new(config.database.path.clone())
            .max_connections(config.database.max_connections)
            .run_migrations(config.database.run_migrations)
            .catalog(config.catalog)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::in_memory()).await?;
///
/// let phones = db
///     .categories()
///     .create("Phones", Some(&electronics.id))
///     .await?;
/// let products = db.products().for_category(&phones.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    settings: CatalogSettings,
}

impl Database {
    /// Opens the pool and, if enabled, applies pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        debug!(
            path = %config.database_path.display(),
            in_memory = config.in_memory,
            "Opening catalog database"
        );

        let connect_options = config.connect_options()?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(if config.in_memory {
                None
            } else {
                Some(Duration::from_secs(30 * 60))
            })
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Catalog database ready"
        );

        let db = Database {
            pool,
            settings: config.catalog,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Replaces the catalog settings used by repositories created afterwards.
    pub fn with_settings(mut self, settings: CatalogSettings) -> Self {
        self.settings = settings.clamped();
        self
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// For queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone(), self.settings)
    }

    pub fn brands(&self) -> BrandRepository {
        BrandRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// After this every repository call fails.
    pub async fn close(&self) {
        info!("Closing catalog database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_config_from_catalog_config() {
        let mut catalog = CatalogConfig::default();
        catalog.database.max_connections = 9;
        catalog.catalog.max_code_attempts = 4;

        let config = DbConfig::from(&catalog);
        assert_eq!(config.max_connections, 9);
        assert_eq!(config.catalog.max_code_attempts, 4);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_catalog_settings_are_clamped() {
        let config = DbConfig::in_memory().catalog(CatalogSettings {
            default_page_size: 0,
            max_page_size: 0,
            max_code_attempts: 0,
        });

        assert_eq!(config.catalog.max_code_attempts, 1);
        assert_eq!(config.catalog.max_page_size, 1);
        assert_eq!(config.catalog.default_page_size, 1);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }

    #[tokio::test]
    async fn test_with_settings_reaches_repositories() {
        let settings = CatalogSettings {
            default_page_size: 5,
            max_page_size: 10,
            max_code_attempts: 3,
        };
        let db = Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .with_settings(settings);

        assert_eq!(db.settings().max_code_attempts, 3);
        assert_eq!(db.products().settings().max_page_size, 10);
    }
}

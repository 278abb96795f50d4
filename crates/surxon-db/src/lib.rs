//! # surxon-db: Storage Layer for the Surxon Catalog
//!
//! SQLite persistence for categories, products, brands and users, built on
//! sqlx. Uniqueness and hierarchy rules that `surxon-core` checks up front
//! are enforced again here, atomically, against the stored data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Surxon Catalog Data Flow                           │
//! │                                                                         │
//! │  HTTP / admin handler                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    surxon-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CategoryRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_catalog  │  │   │
//! │  │   │ Settings      │    │ BrandRepo     │    │   .sql       │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │    SQLite (UNIQUE constraints, FK cascades, depth triggers)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - `surxon.toml` loading with environment overrides
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage and combined catalog error types
//! - [`repository`] - One repository per aggregate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use surxon_db::{CatalogConfig, Database, DbConfig};
//!
//! let config = CatalogConfig::load(None)?;
//! let db = Database::new(DbConfig::from(&config)).await?;
//!
//! let phones = db.categories().create("Phones", None).await?;
//! let listing = db.products().for_category(&phones.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CatalogConfig, CatalogSettings, ConfigError, DatabaseSettings};
pub use error::{CatalogError, CatalogResult, DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::brand::BrandRepository;
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;

//! # Database Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← constraint name / trigger message extracted    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError ← repositories translate known constraints into           │
//! │       │         domain errors (DuplicateSlug, phone Duplicate, ...)     │
//! │       ▼                                                                 │
//! │  kind() → Validation | NotFound | Conflict | Internal                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use surxon_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint or unique index violation.
    ///
    /// `constraint` is what SQLite reports: `"categories.slug"` for a column
    /// constraint, `"index 'idx_categories_name_parent'"` for an expression
    /// index.
    #[error("Unique constraint failed: {constraint}")]
    UniqueViolation { constraint: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint or trigger `RAISE(ABORT, ...)`.
    #[error("Constraint check failed: {0}")]
    CheckViolation(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored value could not be decoded into a domain type.
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: String, message: String },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(table: impl Into<String>, message: impl ToString) -> Self {
        DbError::CorruptRow {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// True when this is a unique violation whose constraint mentions `name`.
    ///
    /// ```rust
    /// use surxon_db::DbError;
    ///
    /// let err = DbError::UniqueViolation { constraint: "products.code".into() };
    /// assert!(err.is_unique_violation_on("products.code"));
    /// assert!(!err.is_unique_violation_on("categories.slug"));
    /// ```
    pub fn is_unique_violation_on(&self, name: &str) -> bool {
        matches!(self, DbError::UniqueViolation { constraint } if constraint.contains(name))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → classified by SQLite message prefix
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => classify_message(db_err.message()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Maps a SQLite error message onto a DbError variant.
///
/// SQLite formats:
/// - `UNIQUE constraint failed: <table>.<column>`
/// - `UNIQUE constraint failed: index '<name>'`
/// - `FOREIGN KEY constraint failed`
/// - `CHECK constraint failed: <expr>`
/// - anything else raised by a trigger is the trigger's own message
fn classify_message(msg: &str) -> DbError {
    if let Some(constraint) = msg.strip_prefix("UNIQUE constraint failed: ") {
        DbError::UniqueViolation {
            constraint: constraint.to_string(),
        }
    } else if msg.contains("FOREIGN KEY constraint failed") {
        DbError::ForeignKeyViolation {
            message: msg.to_string(),
        }
    } else if msg.starts_with("CHECK constraint failed") || msg.starts_with("surxon:") {
        DbError::CheckViolation(msg.to_string())
    } else {
        DbError::QueryFailed(msg.to_string())
    }
}

/// Result type for raw database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Catalog Error
// =============================================================================

/// Error returned by every repository operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A domain rule rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed or rejected the write.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl CatalogError {
    /// Classifies the error for transport mapping.
    ///
    /// Store-level rejections that slipped past the pre-checks still map to
    /// the closest domain kind: unique violations are conflicts, trigger and
    /// foreign key rejections are validation failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Core(err) => err.kind(),
            CatalogError::Db(err) => match err {
                DbError::NotFound { .. } => ErrorKind::NotFound,
                DbError::UniqueViolation { .. } => ErrorKind::Conflict,
                DbError::ForeignKeyViolation { .. } | DbError::CheckViolation(_) => {
                    ErrorKind::Validation
                }
                _ => ErrorKind::Internal,
            },
        }
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Db(err.into())
    }
}

macro_rules! core_error_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CatalogError {
                fn from(err: $ty) -> Self {
                    CatalogError::Core(err.into())
                }
            }
        )*
    };
}

core_error_from!(
    surxon_core::CategoryError,
    surxon_core::ProductError,
    surxon_core::ValidationError,
    surxon_core::PhoneError,
    surxon_core::ColorError,
);

/// Result type for repository operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use surxon_core::{CategoryError, ValidationError};

    #[test]
    fn test_classify_sqlite_messages() {
        assert!(classify_message("UNIQUE constraint failed: categories.slug")
            .is_unique_violation_on("categories.slug"));
        assert!(
            classify_message("UNIQUE constraint failed: index 'idx_categories_name_parent'")
                .is_unique_violation_on("idx_categories_name_parent")
        );
        assert!(matches!(
            classify_message("FOREIGN KEY constraint failed"),
            DbError::ForeignKeyViolation { .. }
        ));
        assert!(matches!(
            classify_message("surxon: products must reference a child category"),
            DbError::CheckViolation(_)
        ));
        assert!(matches!(
            classify_message("no such table: widgets"),
            DbError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_catalog_error_kind() {
        let err: CatalogError = CategoryError::DuplicateSlug("phones".into()).into();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err: CatalogError = ValidationError::Required {
            field: "name".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: CatalogError = DbError::not_found("Brand", "x").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: CatalogError = DbError::PoolExhausted.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}

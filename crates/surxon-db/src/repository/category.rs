//! # Category Repository
//!
//! Storage for the two-level category hierarchy.
//!
//! ## create_or_update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate input (pure)                                                  │
//! │       │                                                                 │
//! │  BEGIN                                                                  │
//! │       ├── existing id given?  must exist          → NotFound            │
//! │       ├── parent id given?    must exist          → ParentNotFound      │
//! │       ├── check_placement     self / depth / demote                     │
//! │       ├── child with products made top-level      → HasProducts         │
//! │       ├── slug: explicit (must be free) | kept | derived + suffix       │
//! │       ├── (name, parent) free                     → DuplicateName       │
//! │       └── INSERT / UPDATE                                               │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  A UNIQUE violation on the write itself maps to DuplicateSlug or        │
//! │  DuplicateName; it is never retried.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use surxon_core::category::{check_placement, next_available_slug, slug_candidate_stem, slugify};
use surxon_core::validation::new_id;
use surxon_core::{Category, CategoryError, CategoryInput, CategoryNode, CategoryRole};

use super::escape_like;
use crate::error::{CatalogError, CatalogResult, DbError};

const CATEGORY_COLUMNS: &str = "id, name, slug, parent_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CategoryRow {
    id: String,
    name: String,
    slug: String,
    parent_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            role: CategoryRole::from_parent_id(row.parent_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Connection-level helpers (usable inside a transaction)
// =============================================================================

pub(crate) async fn fetch_category(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Category>, DbError> {
    let sql = format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS);
    let row = sqlx::query_as::<_, CategoryRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(Category::from))
}

pub(crate) async fn fetch_children(
    conn: &mut SqliteConnection,
    parent_id: &str,
) -> Result<Vec<Category>, DbError> {
    let sql = format!(
        "SELECT {} FROM categories WHERE parent_id = ?1 ORDER BY name, rowid",
        CATEGORY_COLUMNS
    );
    let rows = sqlx::query_as::<_, CategoryRow>(&sql)
        .bind(parent_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.into_iter().map(Category::from).collect())
}

async fn has_children(conn: &mut SqliteConnection, id: &str) -> Result<bool, DbError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM categories WHERE parent_id = ?1 LIMIT 1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn has_products(conn: &mut SqliteConnection, id: &str) -> Result<bool, DbError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE category_id = ?1 LIMIT 1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

/// Every slug that could collide with a candidate derived from `base`,
/// ignoring `exclude_id`.
async fn taken_slugs(
    conn: &mut SqliteConnection,
    base: &str,
    exclude_id: Option<&str>,
) -> Result<HashSet<String>, DbError> {
    let pattern = format!("{}%", escape_like(slug_candidate_stem(base)));
    let slugs: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT slug FROM categories
        WHERE slug LIKE ?1 ESCAPE '\'
          AND (?2 IS NULL OR id <> ?2)
        "#,
    )
    .bind(pattern)
    .bind(exclude_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(slugs.into_iter().collect())
}

async fn slug_in_use(
    conn: &mut SqliteConnection,
    slug: &str,
    exclude_id: Option<&str>,
) -> Result<bool, DbError> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM categories WHERE slug = ?1 AND (?2 IS NULL OR id <> ?2) LIMIT 1",
    )
    .bind(slug)
    .bind(exclude_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(found.is_some())
}

async fn name_in_use(
    conn: &mut SqliteConnection,
    name: &str,
    parent_id: Option<&str>,
    exclude_id: Option<&str>,
) -> Result<bool, DbError> {
    let found: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT 1 FROM categories
        WHERE name = ?1
          AND COALESCE(parent_id, '') = COALESCE(?2, '')
          AND (?3 IS NULL OR id <> ?3)
        LIMIT 1
        "#,
    )
    .bind(name)
    .bind(parent_id)
    .bind(exclude_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(found.is_some())
}

/// Translates a failed category write into the matching domain error.
///
/// `parent_name` is the resolved parent of the write, if any.
fn write_error(
    err: DbError,
    id: &str,
    name: &str,
    slug: &str,
    parent_name: Option<&str>,
) -> CatalogError {
    if err.is_unique_violation_on("categories.slug") {
        return CategoryError::DuplicateSlug(slug.to_string()).into();
    }
    if err.is_unique_violation_on("idx_categories_name_parent") {
        return CategoryError::DuplicateName {
            name: name.to_string(),
        }
        .into();
    }
    if let DbError::CheckViolation(message) = &err {
        if message.contains("another child category") {
            return CategoryError::DepthExceeded {
                parent: parent_name.unwrap_or_default().to_string(),
            }
            .into();
        }
        if message.contains("with children") {
            return CategoryError::CannotDemoteParent(id.to_string()).into();
        }
        if message.contains("with products") {
            return CategoryError::HasProducts(id.to_string()).into();
        }
    }

    err.into()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for category operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Creates a category, or updates the one identified by `existing_id`.
    ///
    /// `input.parent_id == None` means top-level in both cases. Without an
    /// explicit slug an update keeps the current slug, so renaming never
    /// changes URLs.
    pub async fn create_or_update(
        &self,
        input: &CategoryInput,
        existing_id: Option<&str>,
    ) -> CatalogResult<Category> {
        let name = input.validate()?;

        debug!(
            name = %name,
            parent_id = ?input.parent_id,
            existing_id = ?existing_id,
            "Saving category"
        );

        let mut tx = self.pool.begin().await?;

        let existing = match existing_id {
            Some(id) => Some(
                fetch_category(&mut tx, id)
                    .await?
                    .ok_or_else(|| CategoryError::NotFound(id.to_string()))?,
            ),
            None => None,
        };

        let parent = match input.parent_id.as_deref() {
            Some(parent_id) => Some(
                fetch_category(&mut tx, parent_id)
                    .await?
                    .ok_or_else(|| CategoryError::ParentNotFound(parent_id.to_string()))?,
            ),
            None => None,
        };

        let subject_has_children = match &existing {
            Some(category) if parent.is_some() => has_children(&mut tx, &category.id).await?,
            _ => false,
        };
        check_placement(existing_id, parent.as_ref(), subject_has_children)?;

        if let Some(category) = &existing {
            if category.is_child() && parent.is_none() && has_products(&mut tx, &category.id).await? {
                return Err(CategoryError::HasProducts(category.id.clone()).into());
            }
        }

        let slug = match (&input.slug, &existing) {
            (Some(slug), _) => {
                if slug_in_use(&mut tx, slug, existing_id).await? {
                    return Err(CategoryError::DuplicateSlug(slug.clone()).into());
                }
                slug.clone()
            }
            (None, Some(category)) => category.slug.clone(),
            (None, None) => {
                let base = slugify(&name);
                let taken = taken_slugs(&mut tx, &base, None).await?;
                next_available_slug(&base, &taken)
            }
        };

        let parent_id = parent.as_ref().map(|p| p.id.clone());
        let parent_name = parent.as_ref().map(|p| p.name.as_str());
        if name_in_use(&mut tx, &name, parent_id.as_deref(), existing_id).await? {
            return Err(CategoryError::DuplicateName { name }.into());
        }

        let now = Utc::now();
        let category = match existing {
            Some(current) => {
                sqlx::query(
                    r#"
                    UPDATE categories
                    SET name = ?2, slug = ?3, parent_id = ?4, updated_at = ?5
                    WHERE id = ?1
                    "#,
                )
                .bind(&current.id)
                .bind(&name)
                .bind(&slug)
                .bind(&parent_id)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| write_error(e.into(), &current.id, &name, &slug, parent_name))?;

                Category {
                    id: current.id,
                    name,
                    slug,
                    role: CategoryRole::from_parent_id(parent_id),
                    created_at: current.created_at,
                    updated_at: now,
                }
            }
            None => {
                let id = new_id();
                sqlx::query(
                    r#"
                    INSERT INTO categories (id, name, slug, parent_id, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )
                .bind(&id)
                .bind(&name)
                .bind(&slug)
                .bind(&parent_id)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| write_error(e.into(), &id, &name, &slug, parent_name))?;

                Category {
                    id,
                    name,
                    slug,
                    role: CategoryRole::from_parent_id(parent_id),
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        tx.commit().await?;

        info!(
            id = %category.id,
            slug = %category.slug,
            is_parent = category.is_parent(),
            "Category saved"
        );
        Ok(category)
    }

    /// Shorthand for creating a category with a derived slug.
    pub async fn create(&self, name: &str, parent_id: Option<&str>) -> CatalogResult<Category> {
        let mut input = CategoryInput::new(name);
        input.parent_id = parent_id.map(str::to_string);
        self.create_or_update(&input, None).await
    }

    /// Deletes a category with its children and every product under them.
    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CategoryError::NotFound(id.to_string()).into());
        }

        info!(id = %id, "Category deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> CatalogResult<Option<Category>> {
        let mut conn = self.pool.acquire().await?;
        Ok(fetch_category(&mut conn, id).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE slug = ?1", CATEGORY_COLUMNS);
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Category::from))
    }

    /// Direct children, by name. Empty for a child or an unknown id.
    pub async fn children_of(&self, id: &str) -> CatalogResult<Vec<Category>> {
        let mut conn = self.pool.acquire().await?;
        Ok(fetch_children(&mut conn, id).await?)
    }

    /// Every top-level category with its children nested, both by name.
    pub async fn list_tree(&self) -> CatalogResult<Vec<CategoryNode>> {
        let sql = format!(
            "SELECT {} FROM categories ORDER BY name, rowid",
            CATEGORY_COLUMNS
        );
        let categories: Vec<Category> = sqlx::query_as::<_, CategoryRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Category::from)
            .collect();

        let mut children: BTreeMap<String, Vec<Category>> = BTreeMap::new();
        let mut parents = Vec::new();
        for category in categories {
            match category.parent_id() {
                Some(parent_id) => children
                    .entry(parent_id.to_string())
                    .or_default()
                    .push(category),
                None => parents.push(category),
            }
        }

        let tree = parents
            .into_iter()
            .map(|parent| CategoryNode {
                children: children.remove(&parent.id).unwrap_or_default(),
                id: parent.id,
                name: parent.name,
                slug: parent.slug,
            })
            .collect();

        Ok(tree)
    }

    /// `"Parent > Child"` for a child, the bare name for a parent.
    pub async fn full_name(&self, id: &str) -> CatalogResult<String> {
        let mut conn = self.pool.acquire().await?;

        let category = fetch_category(&mut conn, id)
            .await?
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))?;

        let parent = match category.parent_id() {
            Some(parent_id) => fetch_category(&mut conn, parent_id).await?,
            None => None,
        };

        Ok(category.full_name(parent.as_ref()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

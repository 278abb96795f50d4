//! # Brand Repository
//!
//! Brands are referenced loosely: `products.brand_id` is `ON DELETE SET
//! NULL`, so deleting a brand leaves its products in place without a brand.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use surxon_core::validation::new_id;
use surxon_core::{Brand, NewBrand};

use crate::error::{CatalogResult, DbError};

#[derive(Debug, sqlx::FromRow)]
struct BrandRow {
    id: String,
    name: String,
    logo_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Brand {
            id: row.id,
            name: row.name,
            logo_path: row.logo_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) async fn brand_exists(conn: &mut SqliteConnection, id: &str) -> Result<bool, DbError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM brands WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BrandRepository { pool }
    }

    pub async fn create(&self, input: &NewBrand) -> CatalogResult<Brand> {
        let input = input.validate()?;
        let now = Utc::now();
        let brand = Brand {
            id: new_id(),
            name: input.name,
            logo_path: input.logo_path,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO brands (id, name, logo_path, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&brand.id)
        .bind(&brand.name)
        .bind(&brand.logo_path)
        .bind(brand.created_at)
        .bind(brand.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %brand.id, name = %brand.name, "Brand created");
        Ok(brand)
    }

    pub async fn get(&self, id: &str) -> CatalogResult<Option<Brand>> {
        let row = sqlx::query_as::<_, BrandRow>(
            "SELECT id, name, logo_path, created_at, updated_at FROM brands WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Brand::from))
    }

    /// All brands by name.
    pub async fn list(&self) -> CatalogResult<Vec<Brand>> {
        let rows = sqlx::query_as::<_, BrandRow>(
            "SELECT id, name, logo_path, created_at, updated_at FROM brands ORDER BY name, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    /// Deletes a brand; its products keep existing with no brand.
    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        debug!(id = %id, "Deleting brand");

        let result = sqlx::query("DELETE FROM brands WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", id).into());
        }
        Ok(())
    }
}

//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Creation with a generated, unique product code
//! - Partial updates that never touch the code
//! - Category listings that expand parents to their children
//!
//! ## Code Assignment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    category exists? is a child?  brand exists?                          │
//! │    for code in ProductCode::candidates(rng, max_code_attempts):         │
//! │       INSERT ... code                                                   │
//! │         ├── ok                          → COMMIT, done                  │
//! │         ├── UNIQUE products.code        → warn, next attempt            │
//! │         └── anything else               → error                         │
//! │    CodeSpaceExhausted                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A failed INSERT only rolls back its own statement, so the transaction
//! stays usable for the next attempt.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use surxon_core::validation::new_id;
use surxon_core::{
    Category, DiscountRate, Money, NewProduct, Page, PageRequest, Product, ProductCode,
    ProductDetail, ProductError, ProductScope, ProductUpdate,
};

use super::brand::brand_exists;
use super::category::{fetch_category, fetch_children};
use crate::config::CatalogSettings;
use crate::error::{CatalogError, CatalogResult, DbError};

const PRODUCT_COLUMNS: &str = "p.id, p.title, p.description, p.price_cents, p.discount_bps, \
     p.color_codes, p.code, p.category_id, p.brand_id, p.created_at, p.updated_at";

/// Newest first; rowid breaks ties between equal timestamps.
const NEWEST_FIRST: &str = "ORDER BY p.created_at DESC, p.rowid DESC";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    title: String,
    description: String,
    price_cents: i64,
    discount_bps: i64,
    color_codes: String,
    code: String,
    category_id: String,
    brand_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let discount = u32::try_from(row.discount_bps)
            .ok()
            .and_then(|bps| DiscountRate::from_bps(bps).ok())
            .ok_or_else(|| {
                DbError::corrupt("products", format!("discount_bps {}", row.discount_bps))
            })?;

        let color_codes: Vec<String> = serde_json::from_str(&row.color_codes)
            .map_err(|e| DbError::corrupt("products", e))?;

        Ok(Product {
            id: row.id,
            title: row.title,
            description: row.description,
            price: Money::from_minor(row.price_cents),
            discount,
            color_codes,
            code: row.code,
            category_id: row.category_id,
            brand_id: row.brand_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    #[sqlx(flatten)]
    product: ProductRow,
    category_name: String,
    parent_name: Option<String>,
    brand_name: Option<String>,
}

impl TryFrom<ProductDetailRow> for ProductDetail {
    type Error = DbError;

    fn try_from(row: ProductDetailRow) -> Result<Self, Self::Error> {
        let product = Product::try_from(row.product)?;
        let category_full_name = match &row.parent_name {
            Some(parent) => format!("{} > {}", parent, row.category_name),
            None => row.category_name.clone(),
        };

        Ok(ProductDetail {
            discounted_price: product.discounted_price(),
            has_discount: product.has_discount(),
            primary_color: product.primary_color().map(str::to_string),
            category_name: row.category_name,
            category_full_name,
            brand_name: row.brand_name,
            product,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, DbError> {
    rows.into_iter().map(Product::try_from).collect()
}

fn encode_colors(colors: &[String]) -> Result<String, DbError> {
    serde_json::to_string(colors).map_err(|e| DbError::Internal(e.to_string()))
}

/// Resolves a category a product may be linked to.
async fn require_child_category(
    conn: &mut SqliteConnection,
    category_id: &str,
) -> CatalogResult<Category> {
    let category = fetch_category(conn, category_id)
        .await?
        .ok_or_else(|| ProductError::CategoryNotFound(category_id.to_string()))?;

    if category.is_parent() {
        return Err(ProductError::ParentCategory(category_id.to_string()).into());
    }
    Ok(category)
}

async fn require_brand(conn: &mut SqliteConnection, brand_id: &str) -> CatalogResult<()> {
    if !brand_exists(conn, brand_id).await? {
        return Err(ProductError::BrandNotFound(brand_id.to_string()).into());
    }
    Ok(())
}

/// Maps trigger rejections on product writes back to domain errors.
fn write_error(err: DbError, category_id: &str) -> CatalogError {
    match &err {
        DbError::CheckViolation(message) if message.contains("child categories") => {
            ProductError::ParentCategory(category_id.to_string()).into()
        }
        _ => err.into(),
    }
}

/// Appends `WHERE p.category_id IN (...)` for a non-empty scope.
fn push_scope_filter(builder: &mut QueryBuilder<'_, Sqlite>, scope: &ProductScope) {
    builder.push(" WHERE p.category_id IN (");
    let mut ids = builder.separated(", ");
    for id in scope.category_ids() {
        ids.push_bind(id.to_string());
    }
    ids.push_unseparated(")");
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.create(&new_product).await?;
/// let listing = repo.for_category(&electronics.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    settings: CatalogSettings,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool, settings: CatalogSettings) -> Self {
        ProductRepository { pool, settings }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Builds a page request from optional query parameters using the
    /// configured page sizes.
    pub fn page_request(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> CatalogResult<PageRequest> {
        Ok(PageRequest::resolve(
            page,
            page_size,
            self.settings.default_page_size,
            self.settings.max_page_size,
        )?)
    }

    /// Creates a product and assigns it a fresh code.
    ///
    /// ## Errors
    /// - Validation errors for title, description, price, colors
    /// - `CategoryNotFound`, `ParentCategory`, `BrandNotFound`
    /// - `CodeSpaceExhausted` if every sampled code was taken
    pub async fn create(&self, input: &NewProduct) -> CatalogResult<Product> {
        let mut rng = StdRng::from_entropy();
        self.create_with_rng(input, &mut rng).await
    }

    /// [`create`](Self::create) with codes drawn from `rng`.
    pub async fn create_with_rng<R: Rng + Send + ?Sized>(
        &self,
        input: &NewProduct,
        rng: &mut R,
    ) -> CatalogResult<Product> {
        let input = input.validate()?;

        debug!(title = %input.title, category_id = %input.category_id, "Creating product");

        let mut tx = self.pool.begin().await?;

        require_child_category(&mut tx, &input.category_id).await?;
        if let Some(brand_id) = &input.brand_id {
            require_brand(&mut tx, brand_id).await?;
        }

        let id = new_id();
        let now = Utc::now();
        let colors = encode_colors(&input.color_codes)?;
        let max_attempts = self.settings.max_code_attempts;

        for (attempt, code) in (1u32..).zip(ProductCode::candidates(rng, max_attempts)) {
            let code = code.into_inner();

            let result = sqlx::query(
                r#"
                INSERT INTO products (
                    id, title, description, price_cents, discount_bps,
                    color_codes, code, category_id, brand_id,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(&id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price.minor())
            .bind(input.discount.bps() as i64)
            .bind(&colors)
            .bind(&code)
            .bind(&input.category_id)
            .bind(&input.brand_id)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(_) => {
                    tx.commit().await?;
                    info!(id = %id, code = %code, attempt, "Product created");

                    return Ok(Product {
                        id,
                        title: input.title,
                        description: input.description,
                        price: input.price,
                        discount: input.discount,
                        color_codes: input.color_codes,
                        code,
                        category_id: input.category_id,
                        brand_id: input.brand_id,
                        created_at: now,
                        updated_at: now,
                    });
                }
                Err(err) => {
                    let err = DbError::from(err);
                    if err.is_unique_violation_on("products.code") {
                        warn!(code = %code, attempt, "Product code collision, retrying");
                        continue;
                    }
                    return Err(write_error(err, &input.category_id));
                }
            }
        }

        Err(ProductError::CodeSpaceExhausted {
            attempts: max_attempts,
        }
        .into())
    }

    /// Applies a partial update. The product code is never changed.
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> CatalogResult<Product> {
        debug!(id = %id, "Updating product");

        let mut tx = self.pool.begin().await?;

        let current = fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        let mut next = update.apply_to(&current)?;

        if update.changes_category() {
            require_child_category(&mut tx, &next.category_id).await?;
        }
        if let Some(Some(brand_id)) = &update.brand_id {
            require_brand(&mut tx, brand_id).await?;
        }

        next.updated_at = Utc::now();
        let colors = encode_colors(&next.color_codes)?;

        sqlx::query(
            r#"
            UPDATE products SET
                title = ?2,
                description = ?3,
                price_cents = ?4,
                discount_bps = ?5,
                color_codes = ?6,
                category_id = ?7,
                brand_id = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&next.id)
        .bind(&next.title)
        .bind(&next.description)
        .bind(next.price.minor())
        .bind(next.discount.bps() as i64)
        .bind(&colors)
        .bind(&next.category_id)
        .bind(&next.brand_id)
        .bind(next.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e.into(), &next.category_id))?;

        tx.commit().await?;
        Ok(next)
    }

    pub async fn get(&self, id: &str) -> CatalogResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Ok(fetch_product(&mut conn, id).await?)
    }

    pub async fn get_by_code(&self, code: &str) -> CatalogResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products p WHERE p.code = ?1", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::try_from).transpose()?)
    }

    /// Product with category path, brand name and derived pricing.
    pub async fn get_detail(&self, id: &str) -> CatalogResult<Option<ProductDetail>> {
        let sql = format!(
            r#"
            SELECT {},
                c.name AS category_name,
                pc.name AS parent_name,
                b.name AS brand_name
            FROM products p
            INNER JOIN categories c ON c.id = p.category_id
            LEFT JOIN categories pc ON pc.id = c.parent_id
            LEFT JOIN brands b ON b.id = p.brand_id
            WHERE p.id = ?1
            "#,
            PRODUCT_COLUMNS
        );
        let row = sqlx::query_as::<_, ProductDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ProductDetail::try_from).transpose()?)
    }

    /// All products, newest first, one page at a time.
    pub async fn list(&self, request: PageRequest) -> CatalogResult<Page<Product>> {
        let request = self.clamp(request);
        let count = self.count().await?;

        let sql = format!(
            "SELECT {} FROM products p {} LIMIT ?1 OFFSET ?2",
            PRODUCT_COLUMNS, NEWEST_FIRST
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(into_products(rows)?, count as u64, request))
    }

    /// Products under a category, newest first.
    ///
    /// A parent lists the products of all its current children; a child
    /// lists its own. The hierarchy is read fresh on every call.
    pub async fn for_category(&self, category_id: &str) -> CatalogResult<Vec<Product>> {
        let mut tx = self.pool.begin().await?;

        let scope = resolve_scope(&mut tx, category_id).await?;
        debug!(category_id = %category_id, scope = ?scope, "Listing products for category");

        if scope.is_empty() {
            tx.commit().await?;
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM products p",
            PRODUCT_COLUMNS
        ));
        push_scope_filter(&mut builder, &scope);
        builder.push(" ");
        builder.push(NEWEST_FIRST);

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(into_products(rows)?)
    }

    /// Paged form of [`for_category`](Self::for_category).
    pub async fn for_category_page(
        &self,
        category_id: &str,
        request: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        let request = self.clamp(request);
        let mut tx = self.pool.begin().await?;

        let scope = resolve_scope(&mut tx, category_id).await?;
        if scope.is_empty() {
            tx.commit().await?;
            return Ok(Page::new(Vec::new(), 0, request));
        }

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products p");
        push_scope_filter(&mut count_query, &scope);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await?;

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM products p",
            PRODUCT_COLUMNS
        ));
        push_scope_filter(&mut builder, &scope);
        builder.push(" ");
        builder.push(NEWEST_FIRST);
        builder.push(" LIMIT ");
        builder.push_bind(request.limit());
        builder.push(" OFFSET ");
        builder.push_bind(request.offset());

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Page::new(into_products(rows)?, count as u64, request))
    }

    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(id.to_string()).into());
        }
        Ok(())
    }

    pub async fn count(&self) -> CatalogResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    fn clamp(&self, request: PageRequest) -> PageRequest {
        PageRequest {
            page: request.page.max(1),
            page_size: request.page_size.clamp(1, self.settings.max_page_size.max(1)),
        }
    }
}

async fn fetch_product(conn: &mut SqliteConnection, id: &str) -> Result<Option<Product>, DbError> {
    let sql = format!("SELECT {} FROM products p WHERE p.id = ?1", PRODUCT_COLUMNS);
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(Product::try_from).transpose()
}

async fn resolve_scope(conn: &mut SqliteConnection, category_id: &str) -> CatalogResult<ProductScope> {
    let category = fetch_category(conn, category_id)
        .await?
        .ok_or_else(|| ProductError::CategoryNotFound(category_id.to_string()))?;

    let child_ids = if category.is_parent() {
        fetch_children(conn, &category.id)
            .await?
            .into_iter()
            .map(|child| child.id)
            .collect()
    } else {
        Vec::new()
    };

    Ok(ProductScope::for_category(&category, child_ids))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{db, new_product, parent_and_child};
    use std::collections::HashSet;
    use surxon_core::{CoreError, ErrorKind, NewBrand};

    fn product_error(err: CatalogError) -> ProductError {
        match err {
            CatalogError::Core(CoreError::Product(err)) => err,
            other => panic!("expected a product error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_well_formed_code() {
        let db = db().await;
        let (_, phones) = parent_and_child(&db, "Electronics", "Phones").await;

        let product = db
            .products()
            .create(&new_product("Pixel", &phones.id))
            .await
            .unwrap();

        assert!(ProductCode::is_well_formed(&product.code));
        let by_code = db.products().get_by_code(&product.code).await.unwrap().unwrap();
        assert_eq!(by_code, product);
    }

    #[tokio::test]
    async fn test_codes_are_unique_across_many_products() {
        let db = db().await;
        let (_, phones) = parent_and_child(&db, "Electronics", "Phones").await;

        let mut codes = HashSet::new();
        for i in 0..250 {
            let product = db
                .products()
                .create(&new_product(&format!("Phone {}", i), &phones.id))
                .await
                .unwrap();
            assert!(codes.insert(product.code));
        }
        assert_eq!(db.products().count().await.unwrap(), 250);
    }

    /// Gives the product `product_id` the code `code`.
    async fn force_code(db: &crate::Database, product_id: &str, code: &ProductCode) {
        sqlx::query("UPDATE products SET code = ?1 WHERE id = ?2")
            .bind(code.as_str())
            .bind(product_id)
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_code_collision_draws_next_code() {
        let db = db().await;
        let (_, phones) = parent_and_child(&db, "Electronics", "Phones").await;

        let mut preview = StdRng::seed_from_u64(11);
        let first = ProductCode::generate(&mut preview);
        let second = ProductCode::generate(&mut preview);

        let existing = db.products().create(&new_product("Old", &phones.id)).await.unwrap();
        force_code(&db, &existing.id, &first).await;

        let mut rng = StdRng::seed_from_u64(11);
        let product = db
            .products()
            .create_with_rng(&new_product("New", &phones.id), &mut rng)
            .await
            .unwrap();

        assert_ne!(product.code, first.as_str());
        assert_eq!(product.code, second.as_str());
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_code_space_exhausted_after_max_attempts() {
        let db = db().await.with_settings(CatalogSettings {
            max_code_attempts: 1,
            ..CatalogSettings::default()
        });
        let (_, phones) = parent_and_child(&db, "Electronics", "Phones").await;

        let first = ProductCode::generate(&mut StdRng::seed_from_u64(5));
        let existing = db.products().create(&new_product("Old", &phones.id)).await.unwrap();
        force_code(&db, &existing.id, &first).await;

        let err = db
            .products()
            .create_with_rng(&new_product("New", &phones.id), &mut StdRng::seed_from_u64(5))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            product_error(err),
            ProductError::CodeSpaceExhausted { attempts: 1 }
        );
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_parent_category_is_rejected() {
        let db = db().await;
        let (electronics, _) = parent_and_child(&db, "Electronics", "Phones").await;

        let err = db
            .products()
            .create(&new_product("Pixel", &electronics.id))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(product_error(err), ProductError::ParentCategory(electronics.id));
    }

    #[tokio::test]
    async fn test_missing_category_and_brand() {
        let db = db().await;
        let (_, phones) = parent_and_child(&db, "Electronics", "Phones").await;

        let missing = new_id();
        let err = db
            .products()
            .create(&new_product("Pixel", &missing))
            .await
            .unwrap_err();
        assert_eq!(product_error(err), ProductError::CategoryNotFound(missing.clone()));

        let mut input = new_product("Pixel", &phones.id);
        input.brand_id = Some(missing.clone());
        let err = db.products().create(&input).await.unwrap_err();
        assert_eq!(product_error(err), ProductError::BrandNotFound(missing));
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_storage() {
        let db = db().await;
        let (_, phones) = parent_and_child(&db, "Electronics", "Phones").await;

        let mut input = new_product("Pixel", &phones.id);
        input.color_codes = vec!["#FF0000".into(), "#abc".into()];
        let err = db.products().create(&input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let blank_title = new_product("  ", &phones.id);
        assert!(db.products().create(&blank_title).await.is_err());
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_code() {
        let db = db().await;
        let (electronics, phones) = parent_and_child(&db, "Electronics", "Phones").await;
        let laptops = db
            .categories()
            .create("Laptops", Some(&electronics.id))
            .await
            .unwrap();

        let product = db
            .products()
            .create(&new_product("Pixel", &phones.id))
            .await
            .unwrap();

        let update = ProductUpdate {
            title: Some("Pixel Pro".into()),
            discount: Some(DiscountRate::from_bps(1500).unwrap()),
            category_id: Some(laptops.id.clone()),
            ..Default::default()
        };
        let updated = db.products().update(&product.id, &update).await.unwrap();

        assert_eq!(updated.code, product.code);
        assert_eq!(updated.title, "Pixel Pro");
        assert_eq!(updated.category_id, laptops.id);

        let stored = db.products().get(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.code, product.code);
        assert_eq!(stored.discounted_price().to_string(), "85.00");

        let to_parent = ProductUpdate {
            category_id: Some(electronics.id.clone()),
            ..Default::default()
        };
        let err = db.products().update(&product.id, &to_parent).await.unwrap_err();
        assert_eq!(product_error(err), ProductError::ParentCategory(electronics.id));
    }

    #[tokio::test]
    async fn test_for_category_parent_unions_children_newest_first() {
        let db = db().await;
        let (electronics, phones) = parent_and_child(&db, "Electronics", "Phones").await;
        let laptops = db
            .categories()
            .create("Laptops", Some(&electronics.id))
            .await
            .unwrap();

        let p1 = db.products().create(&new_product("P1", &phones.id)).await.unwrap();
        let l1 = db.products().create(&new_product("L1", &laptops.id)).await.unwrap();
        let p2 = db.products().create(&new_product("P2", &phones.id)).await.unwrap();

        let all: Vec<String> = db
            .products()
            .for_category(&electronics.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(all, vec![p2.id.clone(), l1.id.clone(), p1.id.clone()]);

        let only_phones: Vec<String> = db
            .products()
            .for_category(&phones.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(only_phones, vec![p2.id, p1.id]);
    }

    #[tokio::test]
    async fn test_for_category_sees_new_children() {
        let db = db().await;
        let books = db.categories().create("Books", None).await.unwrap();

        assert!(db.products().for_category(&books.id).await.unwrap().is_empty());

        let novels = db.categories().create("Novels", Some(&books.id)).await.unwrap();
        db.products().create(&new_product("Novel", &novels.id)).await.unwrap();

        assert_eq!(db.products().for_category(&books.id).await.unwrap().len(), 1);

        let err = db.products().for_category(&new_id()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_paging() {
        let db = db().await;
        let (electronics, phones) = parent_and_child(&db, "Electronics", "Phones").await;
        for i in 0..5 {
            db.products()
                .create(&new_product(&format!("P{}", i), &phones.id))
                .await
                .unwrap();
        }

        let request = db.products().page_request(Some(2), Some(2)).unwrap();
        let page = db.products().list(request).await.unwrap();
        assert_eq!(page.count, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "P2");
        assert!(page.has_next);
        assert!(page.has_previous);

        let request = db.products().page_request(Some(3), Some(2)).unwrap();
        let page = db
            .products()
            .for_category_page(&electronics.id, request)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "P0");
        assert!(!page.has_next);

        assert!(db.products().page_request(Some(0), None).is_err());
    }

    #[tokio::test]
    async fn test_detail_and_brand_deletion() {
        let db = db().await;
        let (_, phones) = parent_and_child(&db, "Electronics", "Phones").await;
        let brand = db
            .brands()
            .create(&NewBrand {
                name: "Acme".into(),
                logo_path: None,
            })
            .await
            .unwrap();

        let mut input = new_product("Pixel", &phones.id);
        input.brand_id = Some(brand.id.clone());
        input.color_codes = vec!["#00FF00".into(), "#0000FF".into()];
        input.discount = DiscountRate::from_bps(1000).unwrap();
        let product = db.products().create(&input).await.unwrap();

        let detail = db.products().get_detail(&product.id).await.unwrap().unwrap();
        assert_eq!(detail.category_full_name, "Electronics > Phones");
        assert_eq!(detail.brand_name.as_deref(), Some("Acme"));
        assert_eq!(detail.primary_color.as_deref(), Some("#00FF00"));
        assert_eq!(detail.discounted_price.to_string(), "90.00");
        assert!(detail.has_discount);

        db.brands().delete(&brand.id).await.unwrap();

        let stored = db.products().get(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.brand_id, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db().await;
        let (_, phones) = parent_and_child(&db, "Electronics", "Phones").await;
        let product = db.products().create(&new_product("Pixel", &phones.id)).await.unwrap();

        db.products().delete(&product.id).await.unwrap();
        let err = db.products().delete(&product.id).await.unwrap_err();
        assert_eq!(product_error(err), ProductError::NotFound(product.id));
    }
}

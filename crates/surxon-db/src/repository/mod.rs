//! # Repository Module
//!
//! Storage operations for the catalog, one repository per aggregate.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  caller                                                                 │
//! │    │  db.products().create(&new_product)                                │
//! │    ▼                                                                    │
//! │  ProductRepository                                                      │
//! │    ├── surxon-core validates the input (pure)                           │
//! │    ├── BEGIN; look up category and brand on the same connection         │
//! │    ├── INSERT with a fresh code; code conflict → new code, retry        │
//! │    └── COMMIT                                                           │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  SQLite (UNIQUE constraints and triggers are the final authority)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Helpers that must run inside a caller's transaction take
//! `&mut SqliteConnection` and are called with `&mut *tx`. Nothing inside a
//! transaction touches the pool again, which keeps the single-connection
//! in-memory pool from deadlocking.
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Hierarchy, slugs, tree listing
//! - [`ProductRepository`](product::ProductRepository) - Products, codes, category listings
//! - [`BrandRepository`](brand::BrandRepository) - Brands
//! - [`UserRepository`](user::UserRepository) - Phone-keyed accounts

pub mod brand;
pub mod category;
pub mod product;
pub mod user;

/// Escapes `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{Database, DbConfig};
    use surxon_core::{Category, NewProduct, Money};

    pub async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Creates `parent > child` and returns both.
    pub async fn parent_and_child(db: &Database, parent: &str, child: &str) -> (Category, Category) {
        let parent = db.categories().create(parent, None).await.unwrap();
        let child = db.categories().create(child, Some(&parent.id)).await.unwrap();
        (parent, child)
    }

    pub fn new_product(title: &str, category_id: &str) -> NewProduct {
        NewProduct {
            title: title.to_string(),
            description: format!("{} description", title),
            price: Money::from_minor(100_00),
            discount: Default::default(),
            color_codes: vec![],
            category_id: category_id.to_string(),
            brand_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("phones"), "phones");
        assert_eq!(escape_like("a_b%c\\"), "a\\_b\\%c\\\\");
    }
}

//! # Catalog Query Planning
//!
//! "Products under category X" depends on the hierarchy shape:
//!
//! ```text
//! Electronics (parent) ──► products of Phones ∪ Laptops
//! Phones      (child)  ──► products of Phones
//! ```
//!
//! The plan is derived from the category as it is *now*; callers re-read
//! the category and its children on every request and never cache a plan,
//! since children come and go between calls.

use crate::category::Category;

/// Which categories' products a listing draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductScope {
    /// Products of exactly this child category.
    Exactly(String),
    /// Products of any of these child categories (may be empty).
    AnyOf(Vec<String>),
}

impl ProductScope {
    /// Plans the scope for `category`, given the ids of its direct children.
    ///
    /// `child_ids` is ignored for a child category, which has none.
    pub fn for_category(category: &Category, child_ids: Vec<String>) -> Self {
        if category.is_parent() {
            ProductScope::AnyOf(child_ids)
        } else {
            ProductScope::Exactly(category.id.clone())
        }
    }

    /// Category ids to filter on.
    pub fn category_ids(&self) -> Vec<&str> {
        match self {
            ProductScope::Exactly(id) => vec![id.as_str()],
            ProductScope::AnyOf(ids) => ids.iter().map(String::as_str).collect(),
        }
    }

    /// True when no product can match (a parent without children).
    pub fn is_empty(&self) -> bool {
        matches!(self, ProductScope::AnyOf(ids) if ids.is_empty())
    }
}

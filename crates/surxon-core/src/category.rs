//! # Category Hierarchy
//!
//! Categories form a **two-level** hierarchy: parents and children.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Electronics (Parent)          Clothing (Parent)                       │
//! │    ├── Phones (Child)            ├── Men (Child)                       │
//! │    └── Laptops (Child)           └── Women (Child)                     │
//! │                                                                         │
//! │  ✅ products attach to children only                                   │
//! │  ❌ a child never has children          (DepthExceeded)                │
//! │  ❌ a parent with children never moves   (CannotDemoteParent)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The role is an explicit enum rather than a recursive `parent: Box<…>`,
//! so a third level cannot be represented in memory at all. The storage
//! layer still keeps a nullable `parent_id` column and re-checks the same
//! rules with triggers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::{CategoryError, ValidationError};
use crate::validation::validate_name;

/// Maximum slug length (matches the `slug` column).
pub const MAX_SLUG_LEN: usize = 255;

/// Slug used when a name contains nothing sluggable.
pub const FALLBACK_SLUG: &str = "category";

// =============================================================================
// Category Role
// =============================================================================

/// Position of a category in the two-level hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryRole {
    /// Top-level category: may have children, never products.
    Parent,
    /// Leaf category: may hold products, never children.
    Child { parent_id: String },
}

impl CategoryRole {
    /// Builds the role from a nullable `parent_id` column.
    pub fn from_parent_id(parent_id: Option<String>) -> Self {
        match parent_id {
            Some(parent_id) => CategoryRole::Child { parent_id },
            None => CategoryRole::Parent,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            CategoryRole::Parent => None,
            CategoryRole::Child { parent_id } => Some(parent_id),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A persisted category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique per parent.
    pub name: String,

    /// URL slug, globally unique.
    pub slug: String,

    /// Parent or child.
    pub role: CategoryRole,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    #[inline]
    pub fn is_parent(&self) -> bool {
        matches!(self.role, CategoryRole::Parent)
    }

    #[inline]
    pub fn is_child(&self) -> bool {
        !self.is_parent()
    }

    #[inline]
    pub fn parent_id(&self) -> Option<&str> {
        self.role.parent_id()
    }

    /// Display path: `"Electronics > Phones"` for children, the bare name
    /// for parents. Callers pass the resolved parent of a child.
    pub fn full_name(&self, parent: Option<&Category>) -> String {
        match (self.parent_id(), parent) {
            (Some(_), Some(parent)) => format!("{} > {}", parent.name, self.name),
            _ => self.name.clone(),
        }
    }
}

/// A parent category with its children, as served by the category listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub children: Vec<Category>,
}

// =============================================================================
// Input
// =============================================================================

/// Create/update request for a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryInput {
    pub name: String,

    /// Explicit slug; derived from the name when absent.
    #[serde(default)]
    pub slug: Option<String>,

    /// Parent to attach to; `None` makes a top-level category.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        CategoryInput {
            name: name.into(),
            slug: None,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Validates field formats and returns the trimmed name.
    pub fn validate(&self) -> Result<String, ValidationError> {
        let name = validate_name("name", &self.name)?;
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        if let Some(parent_id) = &self.parent_id {
            crate::validation::validate_uuid("parent_id", parent_id)?;
        }
        Ok(name)
    }
}

// =============================================================================
// Hierarchy Rules
// =============================================================================

/// Checks that `subject` may be placed under `parent`.
///
/// ## Arguments
/// * `subject_id` - Id of the category being updated, `None` on create
/// * `parent` - Resolved parent, `None` for a top-level placement
/// * `subject_has_children` - Whether the subject currently has children
///
/// ## Rules
/// ```text
/// parent given?
///   ├── parent.id == subject_id        → SelfParent
///   ├── parent is a child              → DepthExceeded
///   └── subject already has children   → CannotDemoteParent
/// no parent → always allowed
/// ```
pub fn check_placement(
    subject_id: Option<&str>,
    parent: Option<&Category>,
    subject_has_children: bool,
) -> Result<(), CategoryError> {
    let Some(parent) = parent else {
        return Ok(());
    };

    if subject_id == Some(parent.id.as_str()) {
        return Err(CategoryError::SelfParent(parent.id.clone()));
    }

    if parent.is_child() {
        return Err(CategoryError::DepthExceeded {
            parent: parent.name.clone(),
        });
    }

    if subject_has_children {
        let id = subject_id.unwrap_or_default().to_string();
        return Err(CategoryError::CannotDemoteParent(id));
    }

    Ok(())
}

// =============================================================================
// Slugs
// =============================================================================

/// Lower-case-hyphenates a name.
///
/// Letters (any script), digits and `_` are kept, runs of whitespace and
/// hyphens collapse into one `-`, everything else is dropped, and leading or
/// trailing `-`/`_` are trimmed. Falls back to [`FALLBACK_SLUG`].
///
/// ```rust
/// use surxon_core::category::slugify;
///
/// assert_eq!(slugify("  Smart Phones & Tablets "), "smart-phones-tablets");
/// assert_eq!(slugify("Kiyim-kechak"), "kiyim-kechak");
/// assert_eq!(slugify("!!!"), "category");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    let slug = slug.trim_matches(|c| c == '-' || c == '_');
    if slug.is_empty() {
        return FALLBACK_SLUG.to_string();
    }

    truncate_chars(slug, MAX_SLUG_LEN).to_string()
}

/// Validates an explicitly supplied slug.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::Required {
            field: "slug".to_string(),
        });
    }

    if slug.chars().count() > MAX_SLUG_LEN {
        return Err(ValidationError::TooLong {
            field: "slug".to_string(),
            max: MAX_SLUG_LEN,
        });
    }

    let allowed = |c: char| (c.is_alphanumeric() && !c.is_uppercase()) || c == '-' || c == '_';
    if !slug.chars().all(allowed) {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must contain only lowercase letters, numbers, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Longest `-N` suffix: a hyphen and the digits of `u64::MAX`.
const MAX_SUFFIX_LEN: usize = 21;

/// Prefix shared by `base` and every candidate [`next_available_slug`] can
/// produce for it, even when a suffix forces `base` to be truncated.
///
/// Looking up taken slugs by this prefix never misses a candidate.
pub fn slug_candidate_stem(base: &str) -> &str {
    truncate_chars(base, MAX_SLUG_LEN - MAX_SUFFIX_LEN)
}

/// Picks `base`, or the first of `base-1`, `base-2`, … not in `taken`.
///
/// Deterministic: the same inputs always yield the same slug. A base at
/// [`MAX_SLUG_LEN`] is shortened to make room for the suffix.
pub fn next_available_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    (1u64..)
        .map(|n| {
            let suffix = format!("-{}", n);
            let room = MAX_SLUG_LEN.saturating_sub(suffix.len());
            format!("{}{}", truncate_chars(base, room), suffix)
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

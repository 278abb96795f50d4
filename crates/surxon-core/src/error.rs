//! # Error Types
//!
//! Domain-specific error types for surxon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  surxon-core errors (this file)                                        │
//! │  ├── PhoneError       - Uzbekistan phone format failures               │
//! │  ├── ColorError       - Invalid HEX color entries                      │
//! │  ├── CategoryError    - Hierarchy depth / naming violations            │
//! │  ├── ProductError     - Product placement and code generation          │
//! │  ├── ValidationError  - Generic field validation failures              │
//! │  └── CoreError        - Umbrella over all of the above                 │
//! │                                                                         │
//! │  surxon-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── CatalogError     - CoreError | DbError, what callers see          │
//! │                                                                         │
//! │  Flow: PhoneError/... → CoreError → CatalogError → transport layer     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant maps onto one [`ErrorKind`], which is all a transport
//! layer needs to pick a response status.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification used by callers to map errors uniformly.
///
/// ```text
/// Validation → malformed input, detected locally (400)
/// NotFound   → dangling id reference, never retried (404)
/// Conflict   → uniqueness violation at commit (409)
/// Internal   → storage failure (500)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

// =============================================================================
// Phone Error
// =============================================================================

/// Reasons a phone number fails Uzbekistan format validation.
///
/// Checks run in declaration order, so the first failing rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("Phone number must start with +998 or 998")]
    InvalidPrefix,

    #[error("Uzbekistan phone number must be 12 digits long (including country code 998)")]
    InvalidLength,

    #[error("Phone number must contain only digits")]
    NonDigit,

    #[error("Invalid Uzbekistan mobile operator code: {0}")]
    InvalidOperatorCode(String),
}

// =============================================================================
// Color Error
// =============================================================================

/// A color list entry that is not a `#RRGGBB` HEX code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Invalid HEX color code: {0}. Use format #RRGGBB (e.g., #FF0000)")]
    InvalidHexColor(String),
}

// =============================================================================
// Category Error
// =============================================================================

/// Violations of the two-level category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// The category being updated or deleted does not exist.
    #[error("Category not found: {0}")]
    NotFound(String),

    /// The requested parent does not exist.
    #[error("Parent category not found: {0}")]
    ParentNotFound(String),

    /// The requested parent is itself a child.
    ///
    /// ```text
    /// Electronics            (parent)
    ///   └── Phones           (child)
    ///         └── Android    ← DepthExceeded
    /// ```
    #[error("A child category cannot be linked to another child category ({parent})")]
    DepthExceeded { parent: String },

    /// A category with children was asked to become a child.
    #[error("Category {0} has child categories and cannot be made a child itself")]
    CannotDemoteParent(String),

    /// A child that still has products was asked to become top-level.
    #[error("Category {0} has products and cannot become a top-level category")]
    HasProducts(String),

    /// A category was asked to be its own parent.
    #[error("Category {0} cannot be its own parent")]
    SelfParent(String),

    /// Another category under the same parent already uses this name.
    #[error("Category '{name}' already exists under this parent")]
    DuplicateName { name: String },

    /// An explicitly requested slug is already taken.
    #[error("Slug '{0}' is already in use")]
    DuplicateSlug(String),
}

// =============================================================================
// Product Error
// =============================================================================

/// Product placement and identity errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Products can only be linked to child categories.
    #[error("Products can only be linked to child categories ({0} is a parent)")]
    ParentCategory(String),

    #[error("Brand not found: {0}")]
    BrandNotFound(String),

    /// Every sampled code collided; practically unreachable with 26³×10⁴ codes.
    #[error("Could not generate a unique product code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Invalid format (e.g., invalid UUID, malformed decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., phone number already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella over every domain error in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Phone(#[from] PhoneError),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies the error for transport mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Phone(_) | CoreError::Color(_) => ErrorKind::Validation,
            CoreError::Category(err) => match err {
                CategoryError::NotFound(_) | CategoryError::ParentNotFound(_) => {
                    ErrorKind::NotFound
                }
                CategoryError::DuplicateName { .. } | CategoryError::DuplicateSlug(_) => {
                    ErrorKind::Conflict
                }
                CategoryError::DepthExceeded { .. }
                | CategoryError::CannotDemoteParent(_)
                | CategoryError::HasProducts(_)
                | CategoryError::SelfParent(_) => ErrorKind::Validation,
            },
            CoreError::Product(err) => match err {
                ProductError::NotFound(_)
                | ProductError::CategoryNotFound(_)
                | ProductError::BrandNotFound(_) => ErrorKind::NotFound,
                ProductError::ParentCategory(_) => ErrorKind::Validation,
                ProductError::CodeSpaceExhausted { .. } => ErrorKind::Conflict,
            },
            CoreError::Validation(ValidationError::Duplicate { .. }) => ErrorKind::Conflict,
            CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

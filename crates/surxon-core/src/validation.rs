//! # Validation Module
//!
//! Field-level input validation shared by the catalog entities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (outside this workspace)                        │
//! │  └── Deserialization into typed inputs                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + entity validators                              │
//! │  ├── names, titles, ids, prices                                        │
//! │  └── phone / color / discount rules in their own modules               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints (slug, code, phone, name+parent)               │
//! │  ├── CHECK constraints (price, discount range)                         │
//! │  └── Triggers (hierarchy depth, product placement)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::{Money, MAX_PRICE_MINOR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of names and titles (VARCHAR(255)).
pub const MAX_NAME_LEN: usize = 255;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a short display string and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 255 characters
///
/// ```rust
/// use surxon_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Phones ").unwrap(), "Phones");
/// assert!(validate_name("name", "").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a required free-text field (no length cap).
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price.
///
/// ## Rules
/// - Must be non-negative (free items allowed)
/// - Must fit DECIMAL(10,2)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.minor() > MAX_PRICE_MINOR {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: "0.00".to_string(),
            max: Money::from_minor(MAX_PRICE_MINOR).to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
///
/// ```rust
/// use surxon_core::validation::validate_uuid;
///
/// assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Generates a new entity id (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("title", "iPhone 15").unwrap(), "iPhone 15");
        assert!(validate_name("title", "   ").is_err());
        assert!(validate_name("title", &"A".repeat(255)).is_ok());
        assert!(matches!(
            validate_name("title", &"A".repeat(256)),
            Err(ValidationError::TooLong { max: 255, .. })
        ));
    }

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("description", "long text").is_ok());
        assert!(validate_required_text("description", "\n").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_minor(1099)).is_ok());
        assert!(validate_price(Money::from_minor(MAX_PRICE_MINOR)).is_ok());
        assert!(validate_price(Money::from_minor(-1)).is_err());
        assert!(validate_price(Money::from_minor(MAX_PRICE_MINOR + 1)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", &new_id()).is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }
}

//! # Brands
//!
//! A brand is a name plus an optional logo asset. Products reference brands
//! loosely: deleting a brand clears the reference instead of deleting the
//! product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_name, ValidationResult};

/// Logo file extensions accepted (compared case-insensitively).
pub const LOGO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Brand {
    pub id: String,
    pub name: String,
    /// Path of the uploaded logo, relative to the media root.
    pub logo_path: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Create request for a brand.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBrand {
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl NewBrand {
    /// Validates the input and returns a trimmed copy.
    pub fn validate(&self) -> ValidationResult<NewBrand> {
        let name = validate_name("name", &self.name)?;
        if let Some(path) = &self.logo_path {
            validate_logo_path(path)?;
        }
        Ok(NewBrand {
            name,
            logo_path: self.logo_path.clone(),
        })
    }
}

/// Checks that a logo path ends in `.jpg`, `.jpeg` or `.png`.
///
/// ```rust
/// use surxon_core::brand::validate_logo_path;
///
/// assert!(validate_logo_path("brands/logos/acme.PNG").is_ok());
/// assert!(validate_logo_path("brands/logos/acme.gif").is_err());
/// ```
pub fn validate_logo_path(path: &str) -> ValidationResult<()> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if LOGO_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::NotAllowed {
            field: "logo".to_string(),
            allowed: LOGO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_extensions() {
        assert!(validate_logo_path("a.jpg").is_ok());
        assert!(validate_logo_path("a.JPEG").is_ok());
        assert!(validate_logo_path("nested/dir/a.png").is_ok());

        assert!(validate_logo_path("a.svg").is_err());
        assert!(validate_logo_path("png").is_err());
        assert!(validate_logo_path("").is_err());
    }

    #[test]
    fn test_new_brand_validation() {
        let brand = NewBrand {
            name: " Acme ".to_string(),
            logo_path: None,
        };
        assert_eq!(brand.validate().unwrap().name, "Acme");

        let brand = NewBrand {
            name: "Acme".to_string(),
            logo_path: Some("logo.webp".to_string()),
        };
        assert!(matches!(
            brand.validate(),
            Err(ValidationError::NotAllowed { .. })
        ));
    }
}

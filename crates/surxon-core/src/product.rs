//! # Products
//!
//! Product types, input validation and the product code generator.
//!
//! ## Dual-Key Identity
//! Every product has:
//! - `id`: UUID v4, immutable, used for relations
//! - `code`: short human-facing identifier (`MNK-0258`), generated once at
//!   creation and never regenerated
//!
//! ## Product Codes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Format:  [A-Z]{3} "-" [0-9]{4}          e.g. MNK-0258                  │
//! │  Space:   26³ × 10⁴ ≈ 1.76 × 10⁸ codes                                  │
//! │                                                                         │
//! │  sample ──► taken? ──yes──► sample again (bounded)                     │
//! │               │                                                         │
//! │               no                                                        │
//! │               ▼                                                         │
//! │             use it                                                      │
//! │                                                                         │
//! │  The store's UNIQUE(code) is the authority: the repository inserts     │
//! │  optimistically and treats a code conflict as "sample again".          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::color::validate_color_codes;
use crate::error::{CoreResult, ProductError};
use crate::money::{self, DiscountRate, Money, PreciseMoney};
use crate::validation::{validate_name, validate_price, validate_required_text, validate_uuid};

// =============================================================================
// Product Code
// =============================================================================

/// A product code in `AAA-0000` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductCode(String);

impl ProductCode {
    /// Samples a code; every character is drawn uniformly.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut code = String::with_capacity(8);
        for _ in 0..3 {
            code.push(rng.gen_range(b'A'..=b'Z') as char);
        }
        code.push('-');
        for _ in 0..4 {
            code.push(rng.gen_range(b'0'..=b'9') as char);
        }
        ProductCode(code)
    }

    /// Up to `max_attempts` freshly sampled codes.
    ///
    /// The storage layer walks this sequence, inserting each code until one
    /// is accepted; [`generate_unique`](Self::generate_unique) walks it
    /// against an in-memory check.
    pub fn candidates<'a, R: Rng + ?Sized>(
        rng: &'a mut R,
        max_attempts: u32,
    ) -> impl Iterator<Item = ProductCode> + 'a {
        (0..max_attempts).map(move |_| ProductCode::generate(&mut *rng))
    }

    /// Samples until `is_taken` reports a free code.
    ///
    /// ## Errors
    /// `CodeSpaceExhausted` after `max_attempts` collisions in a row.
    pub fn generate_unique<R, F>(
        rng: &mut R,
        mut is_taken: F,
        max_attempts: u32,
    ) -> Result<Self, ProductError>
    where
        R: Rng + ?Sized,
        F: FnMut(&str) -> bool,
    {
        ProductCode::candidates(rng, max_attempts)
            .find(|code| !is_taken(code.as_str()))
            .ok_or(ProductError::CodeSpaceExhausted {
                attempts: max_attempts,
            })
    }

    /// Checks the `AAA-0000` shape.
    pub fn is_well_formed(code: &str) -> bool {
        let bytes = code.as_bytes();
        bytes.len() == 8
            && bytes[..3].iter().all(u8::is_ascii_uppercase)
            && bytes[3] == b'-'
            && bytes[4..].iter().all(u8::is_ascii_digit)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product linked to a child category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub title: String,

    pub description: String,

    /// Base price in minor units.
    pub price: Money,

    /// Discount in basis points (1250 = 12.50%).
    pub discount: DiscountRate,

    /// Ordered `#RRGGBB` colors; may be empty.
    pub color_codes: Vec<String>,

    /// Generated short code, immutable after creation.
    pub code: String,

    /// Always a child category.
    pub category_id: String,

    pub brand_id: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Exact price after discount, computed on read.
    #[inline]
    pub fn discounted_price(&self) -> PreciseMoney {
        money::discounted_price(self.price, self.discount)
    }

    #[inline]
    pub fn has_discount(&self) -> bool {
        money::has_discount(self.discount)
    }

    /// First color, shown as the swatch in product details.
    pub fn primary_color(&self) -> Option<&str> {
        self.color_codes.first().map(String::as_str)
    }
}

/// Product with resolved names and derived pricing, for detail views.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,

    pub category_name: String,

    /// `"Parent > Child"`.
    pub category_full_name: String,

    pub brand_name: Option<String>,

    pub discounted_price: PreciseMoney,

    pub has_discount: bool,

    pub primary_color: Option<String>,
}

// =============================================================================
// Inputs
// =============================================================================

/// Create request for a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub discount: DiscountRate,
    #[serde(default)]
    pub color_codes: Vec<String>,
    pub category_id: String,
    #[serde(default)]
    pub brand_id: Option<String>,
}

impl NewProduct {
    /// Validates every field and returns a trimmed copy.
    ///
    /// Category placement is checked by the repository, which can see the
    /// category; everything checkable locally is checked here.
    pub fn validate(&self) -> CoreResult<NewProduct> {
        let title = validate_name("title", &self.title)?;
        let description = validate_required_text("description", &self.description)?;
        validate_price(self.price)?;
        validate_color_codes(&self.color_codes)?;
        validate_uuid("category_id", &self.category_id)?;
        if let Some(brand_id) = &self.brand_id {
            validate_uuid("brand_id", brand_id)?;
        }

        Ok(NewProduct {
            title,
            description,
            ..self.clone()
        })
    }
}

/// Partial update for a product. `code` is intentionally absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub discount: Option<DiscountRate>,
    pub color_codes: Option<Vec<String>>,
    pub category_id: Option<String>,
    /// `Some(None)` clears the brand.
    pub brand_id: Option<Option<String>>,
}

impl ProductUpdate {
    /// Applies the update to `current`, re-validating the result.
    pub fn apply_to(&self, current: &Product) -> CoreResult<Product> {
        let mut next = current.clone();

        if let Some(title) = &self.title {
            next.title = validate_name("title", title)?;
        }
        if let Some(description) = &self.description {
            next.description = validate_required_text("description", description)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
            next.price = price;
        }
        if let Some(discount) = self.discount {
            next.discount = discount;
        }
        if let Some(colors) = &self.color_codes {
            validate_color_codes(colors)?;
            next.color_codes = colors.clone();
        }
        if let Some(category_id) = &self.category_id {
            validate_uuid("category_id", category_id)?;
            next.category_id = category_id.clone();
        }
        if let Some(brand_id) = &self.brand_id {
            if let Some(id) = brand_id {
                validate_uuid("brand_id", id)?;
            }
            next.brand_id = brand_id.clone();
        }

        Ok(next)
    }

    pub fn changes_category(&self) -> bool {
        self.category_id.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ColorError, CoreError, ValidationError};
    use crate::validation::new_id;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: new_id(),
            title: "Galaxy S24".to_string(),
            description: "Flagship phone".to_string(),
            price: Money::from_minor(10000),
            discount: DiscountRate::from_bps(2500).unwrap(),
            color_codes: vec!["#000000".to_string(), "#FFFFFF".to_string()],
            code: "MNK-0258".to_string(),
            category_id: new_id(),
            brand_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_input() -> NewProduct {
        NewProduct {
            title: "  Galaxy S24 ".to_string(),
            description: "Flagship phone".to_string(),
            price: Money::from_minor(10000),
            discount: DiscountRate::zero(),
            color_codes: vec![],
            category_id: new_id(),
            brand_id: None,
        }
    }

    #[test]
    fn test_generated_codes_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let code = ProductCode::generate(&mut rng);
            assert!(ProductCode::is_well_formed(code.as_str()), "{}", code);
        }
    }

    #[test]
    fn test_candidates_follow_generate() {
        let mut expected_rng = StdRng::seed_from_u64(3);
        let expected: Vec<ProductCode> = (0..4)
            .map(|_| ProductCode::generate(&mut expected_rng))
            .collect();

        let mut rng = StdRng::seed_from_u64(3);
        let codes: Vec<ProductCode> = ProductCode::candidates(&mut rng, 4).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_thousand_unique_codes_against_empty_set() {
        let mut rng = rand::thread_rng();
        let mut taken = HashSet::new();

        for _ in 0..1000 {
            let code = ProductCode::generate_unique(&mut rng, |c| taken.contains(c), 32).unwrap();
            assert!(ProductCode::is_well_formed(code.as_str()));
            assert!(taken.insert(code.into_inner()));
        }

        assert_eq!(taken.len(), 1000);
    }

    #[test]
    fn test_generate_unique_retries_on_collision() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut calls = 0;

        let code = ProductCode::generate_unique(
            &mut rng,
            |_| {
                calls += 1;
                calls < 3
            },
            10,
        )
        .unwrap();

        assert_eq!(calls, 3);
        assert!(ProductCode::is_well_formed(code.as_str()));
    }

    #[test]
    fn test_generate_unique_is_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = ProductCode::generate_unique(&mut rng, |_| true, 5);
        assert_eq!(result, Err(ProductError::CodeSpaceExhausted { attempts: 5 }));
    }

    #[test]
    fn test_is_well_formed() {
        assert!(ProductCode::is_well_formed("MNK-0258"));
        assert!(!ProductCode::is_well_formed("mnk-0258"));
        assert!(!ProductCode::is_well_formed("MNK0258"));
        assert!(!ProductCode::is_well_formed("MN-02580"));
        assert!(!ProductCode::is_well_formed("MNK-02A8"));
    }

    #[test]
    fn test_product_pricing() {
        let mut product = sample_product();
        assert_eq!(product.discounted_price().to_string(), "75.00");
        assert!(product.has_discount());

        product.discount = DiscountRate::zero();
        assert_eq!(product.discounted_price(), PreciseMoney::from(product.price));
        assert!(!product.has_discount());
    }

    #[test]
    fn test_primary_color() {
        let mut product = sample_product();
        assert_eq!(product.primary_color(), Some("#000000"));
        product.color_codes.clear();
        assert_eq!(product.primary_color(), None);
    }

    #[test]
    fn test_new_product_validation() {
        let valid = sample_input().validate().unwrap();
        assert_eq!(valid.title, "Galaxy S24");

        let mut bad = sample_input();
        bad.color_codes = vec!["#FF0000".to_string(), "#abc".to_string()];
        assert_eq!(
            bad.validate().unwrap_err(),
            CoreError::Color(ColorError::InvalidHexColor("#abc".to_string()))
        );

        let mut bad = sample_input();
        bad.price = Money::from_minor(-1);
        assert!(matches!(
            bad.validate(),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let mut bad = sample_input();
        bad.description = " ".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_keeps_code() {
        let product = sample_product();
        let update = ProductUpdate {
            title: Some("Galaxy S24 Ultra".to_string()),
            price: Some(Money::from_minor(20000)),
            brand_id: Some(None),
            ..Default::default()
        };

        let updated = update.apply_to(&product).unwrap();
        assert_eq!(updated.code, product.code);
        assert_eq!(updated.title, "Galaxy S24 Ultra");
        assert_eq!(updated.price.minor(), 20000);
        assert_eq!(updated.brand_id, None);
        assert!(!update.changes_category());
    }

    #[test]
    fn test_update_revalidates() {
        let product = sample_product();

        let update = ProductUpdate {
            color_codes: Some(vec!["red".to_string()]),
            ..Default::default()
        };
        assert!(update.apply_to(&product).is_err());

        let update = ProductUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.apply_to(&product).is_err());
    }

    #[test]
    fn test_new_product_deserialize_defaults() {
        let json = format!(
            r#"{{"title":"Mug","description":"Ceramic","price":4500,"category_id":"{}"}}"#,
            new_id()
        );
        let input: NewProduct = serde_json::from_str(&json).unwrap();
        assert!(input.discount.is_zero());
        assert!(input.color_codes.is_empty());
        assert!(input.brand_id.is_none());
    }
}

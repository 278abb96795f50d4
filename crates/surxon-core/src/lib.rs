//! # surxon-core: Catalog Domain Rules for Surxon
//!
//! This crate holds the rules of the Surxon catalog as pure functions and
//! plain data types. It has no I/O dependencies; storage lives in
//! `surxon-db`, which calls into this crate before every write.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Surxon Catalog                              │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │              Admin / HTTP layer (out of tree)                 │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                 surxon-db (repositories)                      │  │
//! │  │   categories • products • brands • users • migrations         │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │               ★ surxon-core (THIS CRATE) ★                     │  │
//! │  │                                                               │  │
//! │  │   category   product   money   phone   color   pagination     │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                           │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`category`] - Two-level category hierarchy, slugs, placement checks
//! - [`product`] - Products, unique product codes, update rules
//! - [`brand`] - Brands and logo validation
//! - [`user`] - Phone-keyed user accounts
//! - [`phone`] - Uzbekistan phone normalization and validation
//! - [`color`] - `#RRGGBB` color codes
//! - [`money`] - Integer money and discount rates
//! - [`pagination`] - Page requests and result pages
//! - [`query`] - Product scope planning for category listings
//! - [`error`] - Domain error types
//! - [`validation`] - Shared field validators
//!
//! ## Example Usage
//!
//! ```rust
//! use surxon_core::money::{discounted_price, DiscountRate, Money};
//!
//! let price = Money::from_minor(100_00);
//! let discount = DiscountRate::from_bps(1500).unwrap(); // 15%
//!
//! assert_eq!(discounted_price(price, discount).to_string(), "85.00");
//! ```

pub mod brand;
pub mod category;
pub mod color;
pub mod error;
pub mod money;
pub mod pagination;
pub mod phone;
pub mod product;
pub mod query;
pub mod user;
pub mod validation;

// Re-exports so callers can write `surxon_core::Money`
pub use brand::{Brand, NewBrand};
pub use category::{Category, CategoryInput, CategoryNode, CategoryRole};
pub use error::{
    CategoryError, ColorError, CoreError, CoreResult, ErrorKind, PhoneError, ProductError,
    ValidationError,
};
pub use money::{DiscountRate, Money, PreciseMoney};
pub use pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use phone::PhoneNumber;
pub use product::{NewProduct, Product, ProductCode, ProductDetail, ProductUpdate};
pub use query::ProductScope;
pub use user::{NewUser, User};

/// Attempts at drawing an unused product code before giving up.
pub const DEFAULT_MAX_CODE_ATTEMPTS: u32 = 32;

//! # Money Module
//!
//! Provides the `Money`, `DiscountRate` and `PreciseMoney` types and the
//! discount math behind every product price shown in the catalog.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Prices carry two decimal places (DECIMAL(10,2)), discounts carry two  │
//! │  decimal places of a percent (DECIMAL(5,2)).                            │
//! │                                                                         │
//! │  OUR SOLUTION: fixed point integers                                    │
//! │    price      → minor units (100.00 = 10000)                           │
//! │    discount   → basis points (12.50% = 1250)                           │
//! │    discounted → micro units, price × (10000 - bps)                     │
//! │                 (0.10 at 25% = 75000 micro = 0.075, exact)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A discounted price is never rounded here. Two price decimals times two
//! percent decimals need at most six decimals, so [`PreciseMoney`] holds
//! the result exactly. Rounding to tiyin is a display concern
//! ([`PreciseMoney::round_to_minor`]).
//!
//! ## Usage
//! ```rust
//! use surxon_core::money::{discounted_price, has_discount, DiscountRate, Money};
//!
//! let price = Money::parse("100.00").unwrap();
//! let discount = DiscountRate::parse("25").unwrap();
//!
//! assert_eq!(discounted_price(price, discount).to_string(), "75.00");
//! assert!(has_discount(discount));
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

/// Largest price accepted by the storage column (DECIMAL(10,2)).
pub const MAX_PRICE_MINOR: i64 = 99_999_999_99;

/// 100% expressed in basis points.
pub const FULL_DISCOUNT_BPS: u32 = 10_000;

/// Micro units (10⁻⁶) per minor unit (10⁻²).
pub const MICROS_PER_MINOR: i64 = 10_000;

/// Fraction digits carried by [`PreciseMoney`].
const PRECISE_SCALE: usize = 6;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (tiyin; 1 so'm = 100 tiyin).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction never underflows mid-calculation
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - Product prices are validated non-negative before they are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use surxon_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // 10.99
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor parts.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal string such as `"100"`, `"99.9"` or `"1250.00"`.
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - At most two fraction digits (no silent rounding)
    /// - Digits only otherwise
    ///
    /// ```rust
    /// use surxon_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10.5").unwrap().minor(), 1050);
    /// assert!(Money::parse("10.505").is_err());
    /// assert!(Money::parse("ten").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        parse_fixed(input, "price").map(Money)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a percentage discount and returns the exact discounted amount.
    ///
    /// `price - price × bps / 10000` in micro units is
    /// `minor × (10000 - bps)`, so no rounding ever happens.
    ///
    /// ```rust
    /// use surxon_core::money::{DiscountRate, Money};
    ///
    /// let price = Money::from_minor(1999); // 19.99
    /// let discounted = price.apply_discount(DiscountRate::from_bps(1500).unwrap());
    /// assert_eq!(discounted.to_string(), "16.9915");
    /// ```
    pub fn apply_discount(&self, discount: DiscountRate) -> PreciseMoney {
        let remaining = (FULL_DISCOUNT_BPS - discount.bps()) as i128;
        PreciseMoney::from_i128(self.0 as i128 * remaining)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Precise Money
// =============================================================================

/// A monetary value in micro units (10⁻⁶ so'm), the exact result of
/// discount math.
///
/// Serialized as the integer micro count, like [`Money`] serializes minor
/// units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreciseMoney(i64);

impl PreciseMoney {
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        PreciseMoney(micros)
    }

    /// Saturates at the i64 range; validated prices stay far below it.
    fn from_i128(micros: i128) -> Self {
        PreciseMoney(micros.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    #[inline]
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// True when the value has no digits below the minor unit.
    #[inline]
    pub const fn is_whole_minor(&self) -> bool {
        self.0 % MICROS_PER_MINOR == 0
    }

    /// Rounds half-to-even to whole minor units, for display only.
    ///
    /// ```rust
    /// use surxon_core::money::{DiscountRate, Money};
    ///
    /// let exact = Money::from_minor(30).apply_discount(DiscountRate::from_bps(2500).unwrap());
    /// assert_eq!(exact.to_string(), "0.225");
    /// assert_eq!(exact.round_to_minor(), Money::from_minor(22));
    /// ```
    pub fn round_to_minor(&self) -> Money {
        let minor = div_round_half_even(self.0 as i128, MICROS_PER_MINOR as i128);
        Money(minor as i64)
    }
}

impl From<Money> for PreciseMoney {
    fn from(money: Money) -> Self {
        PreciseMoney::from_i128(money.0 as i128 * MICROS_PER_MINOR as i128)
    }
}

impl fmt::Display for PreciseMoney {
    /// Exact decimal with at least two fraction digits: `75.00`, `0.075`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = 10u64.pow(PRECISE_SCALE as u32);

        let fraction = format!("{:0width$}", abs % scale, width = PRECISE_SCALE);
        let trimmed = fraction.trim_end_matches('0');
        let fraction = if trimmed.len() < 2 { &fraction[..2] } else { trimmed };

        write!(f, "{}{}.{}", sign, abs / scale, fraction)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A discount percentage in basis points, always within `[0, 100]`.
///
/// 1 basis point = 0.01%, so `1250` is `12.50%`. Construction is the
/// validation step: an out-of-range value is rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount from basis points (`0..=10000`).
    pub fn from_bps(bps: u32) -> Result<Self, ValidationError> {
        if bps > FULL_DISCOUNT_BPS {
            return Err(discount_out_of_range());
        }
        Ok(DiscountRate(bps))
    }

    /// Parses a percentage such as `"25"`, `"12.5"` or `"0.75"`.
    ///
    /// ```rust
    /// use surxon_core::money::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::parse("12.5").unwrap().bps(), 1250);
    /// assert!(DiscountRate::parse("100.01").is_err());
    /// assert!(DiscountRate::parse("-1").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let bps = parse_fixed(input, "discount_percentage")?;
        if !(0..=FULL_DISCOUNT_BPS as i64).contains(&bps) {
            return Err(discount_out_of_range());
        }
        Ok(DiscountRate(bps as u32))
    }

    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl<'de> Deserialize<'de> for DiscountRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bps = u32::deserialize(deserializer)?;
        DiscountRate::from_bps(bps).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Exact price after applying `discount`; equal to `price` when there is
/// none.
///
/// Computed on read, never stored.
pub fn discounted_price(price: Money, discount: DiscountRate) -> PreciseMoney {
    price.apply_discount(discount)
}

/// True iff the discount percentage is strictly positive.
pub fn has_discount(discount: DiscountRate) -> bool {
    !discount.is_zero()
}

// =============================================================================
// Helpers
// =============================================================================

fn discount_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "discount_percentage".to_string(),
        min: "0".to_string(),
        max: "100".to_string(),
    }
}

/// Parses a decimal with up to two fraction digits into hundredths.
fn parse_fixed(input: &str, field: &str) -> Result<i64, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("must be a decimal number"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid("must be a decimal number"));
    }
    if fraction.len() > 2 {
        return Err(invalid("must have at most 2 decimal places"));
    }
    // DECIMAL(10,2) has at most 8 integer digits
    if whole.trim_start_matches('0').len() > 8 {
        return Err(invalid("is too large"));
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("must be a decimal number"))?
    };
    let fraction_value: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid("must be a decimal number"))? * 10,
        _ => fraction.parse().map_err(|_| invalid("must be a decimal number"))?,
    };

    let value = whole_value * 100 + fraction_value;
    Ok(if negative { -value } else { value })
}

/// Integer division rounding half to even, symmetric around zero.
fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let negative = numerator < 0;
    let n = numerator.abs();
    let mut quotient = n / denominator;
    let remainder = n % denominator;

    let twice = remainder * 2;
    if twice > denominator || (twice == denominator && quotient % 2 == 1) {
        quotient += 1;
    }

    if negative {
        -quotient
    } else {
        quotient
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(bps: u32) -> DiscountRate {
        DiscountRate::from_bps(bps).unwrap()
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).minor(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(10000).to_string(), "100.00");
        assert_eq!(Money::from_minor(7).to_string(), "0.07");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(rate(1250).to_string(), "12.50");
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(Money::parse("100").unwrap().minor(), 10000);
        assert_eq!(Money::parse("100.00").unwrap().minor(), 10000);
        assert_eq!(Money::parse("0.5").unwrap().minor(), 50);
        assert_eq!(Money::parse(".75").unwrap().minor(), 75);
        assert_eq!(Money::parse(" 19.99 ").unwrap().minor(), 1999);
        assert_eq!(Money::parse("-3.10").unwrap().minor(), -310);

        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("1,50").is_err());
        assert!(Money::parse("123456789.00").is_err());
    }

    #[test]
    fn test_discounted_price_examples() {
        let hundred = Money::parse("100.00").unwrap();

        assert_eq!(
            discounted_price(hundred, rate(2500)),
            PreciseMoney::from(Money::from_minor(7500))
        );
        assert_eq!(
            discounted_price(hundred, DiscountRate::zero()),
            PreciseMoney::from(hundred)
        );
        assert_eq!(discounted_price(hundred, rate(10_000)).micros(), 0);
    }

    #[test]
    fn test_discounted_price_is_exact() {
        let exact = discounted_price(Money::from_minor(10), rate(2500));
        assert_eq!(exact.micros(), 75_000);
        assert_eq!(exact.to_string(), "0.075");
        assert!(!exact.is_whole_minor());

        let exact = discounted_price(Money::parse("19.99").unwrap(), rate(1500));
        assert_eq!(exact.to_string(), "16.9915");

        // 0.99 at 12.5% keeps every digit
        let exact = discounted_price(Money::from_minor(99), rate(1250));
        assert_eq!(exact.to_string(), "0.86625");
    }

    #[test]
    fn test_round_to_minor_is_half_even() {
        assert_eq!(PreciseMoney::from_micros(75_000).round_to_minor().minor(), 8);
        assert_eq!(PreciseMoney::from_micros(225_000).round_to_minor().minor(), 22);
        assert_eq!(PreciseMoney::from_micros(-75_000).round_to_minor().minor(), -8);
    }

    #[test]
    fn test_precise_display() {
        assert_eq!(PreciseMoney::from(Money::from_minor(7500)).to_string(), "75.00");
        assert_eq!(PreciseMoney::from_micros(1).to_string(), "0.000001");
        assert_eq!(PreciseMoney::from_micros(-1_500_000).to_string(), "-1.50");
    }

    #[test]
    fn test_has_discount() {
        assert!(!has_discount(DiscountRate::zero()));
        assert!(has_discount(rate(1)));
        assert!(has_discount(rate(10_000)));
    }

    #[test]
    fn test_discount_range_is_rejected_not_clamped() {
        assert!(DiscountRate::from_bps(10_000).is_ok());
        assert!(matches!(
            DiscountRate::from_bps(10_001),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            DiscountRate::parse("-0.01"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            DiscountRate::parse("150"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            DiscountRate::parse("abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_discount_deserialize_validates() {
        let ok: DiscountRate = serde_json::from_str("2500").unwrap();
        assert_eq!(ok.bps(), 2500);
        assert!(serde_json::from_str::<DiscountRate>("20000").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(250);
        assert_eq!((a + b).minor(), 1250);
        assert_eq!((a - b).minor(), 750);
    }
}

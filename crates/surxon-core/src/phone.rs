//! # Phone Numbers
//!
//! Canonicalization and validation of Uzbekistan phone numbers, which key
//! every user account.
//!
//! ## Two Independent Steps
//! ```text
//! raw input ──► normalize() ──► "+998901234567"   (never fails)
//!                    │
//!                    ▼
//!               validate()  ──► Ok / PhoneError   (prefix, length,
//!                                                  digits, operator)
//! ```
//!
//! `normalize` only reshapes input; it does not reject a 9-digit local
//! number with an unknown operator code. `validate` is the gate, and it is
//! run at input time and again before every persist. [`PhoneNumber::parse`]
//! runs both and is the only way to obtain the canonical form stored on a
//! user.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::PhoneError;

/// Country calling code for Uzbekistan.
pub const COUNTRY_CODE: &str = "998";

/// Digits after the country code.
pub const SUBSCRIBER_DIGITS: usize = 9;

/// Mobile and fixed-line operator codes accepted after `998`.
pub const OPERATOR_CODES: [&str; 12] = [
    "90", "91", "93", "94", "95", "97", "98", "99", "33", "71", "77", "88",
];

/// Removes whitespace, hyphens and parentheses.
fn strip_punctuation(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Canonicalizes a phone number to `+998XXXXXXXXX` when derivable.
///
/// ## Rules
/// 1. Strip whitespace, `-`, `(`, `)`
/// 2. `998…` without `+` → `+998…`
/// 3. Exactly 9 characters without country code → `+998` + value
/// 4. Anything else is returned cleaned but otherwise unchanged
///
/// ```rust
/// use surxon_core::phone::normalize;
///
/// assert_eq!(normalize("90 123-45-67"), "+998901234567");
/// assert_eq!(normalize("998 (90) 123 45 67"), "+998901234567");
/// assert_eq!(normalize("12345"), "12345");
/// ```
pub fn normalize(raw: &str) -> String {
    let cleaned = strip_punctuation(raw);

    if cleaned.starts_with(COUNTRY_CODE) {
        return format!("+{}", cleaned);
    }

    if !cleaned.starts_with("+998") && cleaned.chars().count() == SUBSCRIBER_DIGITS {
        return format!("+{}{}", COUNTRY_CODE, cleaned);
    }

    cleaned
}

/// Validates an Uzbekistan phone number (`+998…` or `998…`).
///
/// ## Checks (first failure wins)
/// ```text
/// strip punctuation, drop leading "+" before 998
///      │
///      ├── not "998…"            → InvalidPrefix
///      ├── not 12 characters     → InvalidLength
///      ├── non-digit present     → NonDigit
///      └── operator not allowed  → InvalidOperatorCode
/// ```
///
/// ```rust
/// use surxon_core::error::PhoneError;
/// use surxon_core::phone::validate;
///
/// assert!(validate("+998 90 123 45 67").is_ok());
/// assert_eq!(validate("901234567"), Err(PhoneError::InvalidPrefix));
/// ```
pub fn validate(raw: &str) -> Result<(), PhoneError> {
    let cleaned = strip_punctuation(raw);
    let digits = match cleaned.strip_prefix('+') {
        Some(rest) if rest.starts_with(COUNTRY_CODE) => rest,
        _ => cleaned.as_str(),
    };

    if !digits.starts_with(COUNTRY_CODE) {
        return Err(PhoneError::InvalidPrefix);
    }

    if digits.chars().count() != COUNTRY_CODE.len() + SUBSCRIBER_DIGITS {
        return Err(PhoneError::InvalidLength);
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(PhoneError::NonDigit);
    }

    // All ASCII from here on, so byte slicing is safe
    let operator = &digits[3..5];
    if !OPERATOR_CODES.contains(&operator) {
        return Err(PhoneError::InvalidOperatorCode(operator.to_string()));
    }

    Ok(())
}

// =============================================================================
// Canonical Phone Number
// =============================================================================

/// A validated phone number in canonical `+998XXXXXXXXX` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes then validates `raw`.
    pub fn parse(raw: &str) -> Result<Self, PhoneError> {
        let normalized = normalize(raw);
        validate(&normalized)?;
        Ok(PhoneNumber(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-digit operator code, e.g. `"90"`.
    pub fn operator_code(&self) -> &str {
        &self.0[4..6]
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PhoneNumber::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_numbers() {
        for local in ["901234567", "331234567", "711112233", "123456789"] {
            assert_eq!(normalize(local), format!("+998{}", local));
        }
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("+998 (90) 123-45-67"), "+998901234567");
        assert_eq!(normalize("998901234567"), "+998901234567");
        assert_eq!(normalize("\t90 123 45 67\n"), "+998901234567");
    }

    #[test]
    fn test_normalize_is_idempotent_on_canonical_input() {
        let canonical = "+998901234567";
        assert_eq!(normalize(canonical), canonical);
        assert_eq!(normalize(&normalize("90-123-45-67")), canonical);
    }

    #[test]
    fn test_normalize_leaves_underivable_input() {
        assert_eq!(normalize("+7 912 345 67 89"), "+79123456789");
        assert_eq!(normalize("12345"), "12345");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_validate_accepts_all_operator_codes() {
        for code in OPERATOR_CODES {
            let number = format!("+998{}1234567", code);
            assert_eq!(validate(&number), Ok(()), "{}", number);
            assert_eq!(validate(&number[1..]), Ok(()));
        }
    }

    #[test]
    fn test_validate_error_kinds() {
        assert_eq!(validate("901234567"), Err(PhoneError::InvalidPrefix));
        assert_eq!(validate("+7 912 345 67 89"), Err(PhoneError::InvalidPrefix));
        assert_eq!(validate("+99890123456"), Err(PhoneError::InvalidLength));
        assert_eq!(validate("9989012345678"), Err(PhoneError::InvalidLength));
        assert_eq!(validate("99890123456a"), Err(PhoneError::NonDigit));
        assert_eq!(validate("998901.34567"), Err(PhoneError::NonDigit));
        assert_eq!(
            validate("+998 92 123 45 67"),
            Err(PhoneError::InvalidOperatorCode("92".to_string()))
        );
    }

    #[test]
    fn test_normalize_does_not_validate_operator() {
        let normalized = normalize("121234567");
        assert_eq!(normalized, "+998121234567");
        assert_eq!(
            validate(&normalized),
            Err(PhoneError::InvalidOperatorCode("12".to_string()))
        );
    }

    #[test]
    fn test_phone_number_parse() {
        let phone = PhoneNumber::parse("(90) 123 45 67").unwrap();
        assert_eq!(phone.as_str(), "+998901234567");
        assert_eq!(phone.operator_code(), "90");

        assert!(PhoneNumber::parse("12345").is_err());
    }

    #[test]
    fn test_phone_number_deserialize() {
        let phone: PhoneNumber = serde_json::from_str("\"998 93 000 11 22\"").unwrap();
        assert_eq!(phone.as_str(), "+998930001122");
        assert!(serde_json::from_str::<PhoneNumber>("\"+998001234567\"").is_err());
    }
}

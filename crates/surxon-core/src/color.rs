//! # Color Codes
//!
//! Products carry an ordered, optional list of `#RRGGBB` colors.

use crate::error::ColorError;

/// Validates a single `#RRGGBB` entry.
///
/// ```rust
/// use surxon_core::color::validate_color_code;
///
/// assert!(validate_color_code("#00ff7F").is_ok());
/// assert!(validate_color_code("#abc").is_err());
/// ```
pub fn validate_color_code(color: &str) -> Result<(), ColorError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(ColorError::InvalidHexColor(color.to_string()))
    }
}

/// Validates every entry, failing on the first offending one.
///
/// An empty list is valid.
pub fn validate_color_codes<S: AsRef<str>>(colors: &[S]) -> Result<(), ColorError> {
    colors
        .iter()
        .try_for_each(|color| validate_color_code(color.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_lists() {
        let empty: [&str; 0] = [];
        assert!(validate_color_codes(&empty).is_ok());
        assert!(validate_color_codes(&["#FF0000", "#00ff00", "#0000Ff"]).is_ok());
    }

    #[test]
    fn test_short_entry_is_named() {
        let err = validate_color_codes(&["#FF0000", "#abc"]).unwrap_err();
        assert_eq!(err, ColorError::InvalidHexColor("#abc".to_string()));
    }

    #[test]
    fn test_invalid_entries() {
        for bad in ["FF0000", "#FF00000", "#GG0000", "#FF 000", "", "#", "#ff00é"] {
            assert_eq!(
                validate_color_code(bad),
                Err(ColorError::InvalidHexColor(bad.to_string())),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_first_offender_wins() {
        let colors = vec!["#zzzzzz".to_string(), "#12".to_string()];
        assert_eq!(
            validate_color_codes(&colors),
            Err(ColorError::InvalidHexColor("#zzzzzz".to_string()))
        );
    }
}

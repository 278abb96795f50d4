//! # User Accounts
//!
//! Accounts are keyed by a canonical Uzbekistan phone number. The password
//! hash never leaves the storage layer, so it is not part of [`User`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::phone::PhoneNumber;

/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub phone_number: PhoneNumber,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    #[ts(as = "String")]
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// `"username (+998901234567)"`, as shown in admin listings.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.username, self.phone_number)
    }
}

/// Registration request. `phone_number` is raw user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub phone_number: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub password: String,
}

/// A registration request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedUser {
    pub phone_number: PhoneNumber,
    pub username: String,
    pub full_name: Option<String>,
}

impl NewUser {
    /// Normalizes and validates the phone number and checks the other fields.
    pub fn validate(&self) -> CoreResult<ValidatedUser> {
        if self.phone_number.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "phone_number".to_string(),
            }
            .into());
        }
        let phone_number = PhoneNumber::parse(&self.phone_number)?;

        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::Required {
                field: "username".to_string(),
            }
            .into());
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username".to_string(),
                max: MAX_USERNAME_LEN,
            }
            .into());
        }

        if self.password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            }
            .into());
        }

        let full_name = self
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(ValidatedUser {
            phone_number,
            username: username.to_string(),
            full_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, PhoneError};

    fn input(phone: &str) -> NewUser {
        NewUser {
            phone_number: phone.to_string(),
            username: "aziz".to_string(),
            full_name: Some("  ".to_string()),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_validate_normalizes_phone() {
        let user = input("90 123 45 67").validate().unwrap();
        assert_eq!(user.phone_number.as_str(), "+998901234567");
        assert_eq!(user.full_name, None);
    }

    #[test]
    fn test_validate_rejects_bad_phone() {
        assert!(matches!(
            input("").validate(),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            input("+998 12 345 67 89").validate(),
            Err(CoreError::Phone(PhoneError::InvalidOperatorCode(_)))
        ));
    }

    #[test]
    fn test_validate_requires_username_and_password() {
        let mut user = input("901234567");
        user.username = " ".to_string();
        assert!(user.validate().is_err());

        let mut user = input("901234567");
        user.password.clear();
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_display_name() {
        let user = User {
            id: "u".to_string(),
            username: "aziz".to_string(),
            full_name: None,
            phone_number: PhoneNumber::parse("901234567").unwrap(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
        };
        assert_eq!(user.display_name(), "aziz (+998901234567)");
    }
}

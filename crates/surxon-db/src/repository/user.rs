//! # User Repository
//!
//! Phone-keyed accounts. Phone numbers are stored canonical
//! (`+998XXXXXXXXX`) and are unique; passwords are stored as argon2 PHC
//! strings and never leave this module.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use surxon_core::phone::normalize;
use surxon_core::validation::new_id;
use surxon_core::{NewUser, PhoneNumber, User, ValidationError};

use crate::error::{CatalogError, CatalogResult, DbError};

const USER_COLUMNS: &str = "id, username, full_name, phone_number, password_hash, \
     is_active, is_staff, is_superuser, date_joined";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    full_name: Option<String>,
    phone_number: String,
    password_hash: String,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    date_joined: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, DbError> {
        let phone_number =
            PhoneNumber::parse(&self.phone_number).map_err(|e| DbError::corrupt("users", e))?;

        Ok(User {
            id: self.id,
            username: self.username,
            full_name: self.full_name,
            phone_number,
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            date_joined: self.date_joined,
        })
    }
}

/// Hash a password for storage.
fn hash_password(password: &str) -> Result<String, DbError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn duplicate_phone(phone: &PhoneNumber) -> CatalogError {
    ValidationError::Duplicate {
        field: "phone_number".to_string(),
        value: phone.to_string(),
    }
    .into()
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Registers a regular account.
    pub async fn create_user(&self, input: &NewUser) -> CatalogResult<User> {
        self.insert(input, false).await
    }

    /// Registers an account with staff and superuser rights.
    pub async fn create_superuser(&self, input: &NewUser) -> CatalogResult<User> {
        self.insert(input, true).await
    }

    async fn insert(&self, input: &NewUser, privileged: bool) -> CatalogResult<User> {
        let validated = input.validate()?;
        let password_hash = hash_password(&input.password)?;

        let user = User {
            id: new_id(),
            username: validated.username,
            full_name: validated.full_name,
            phone_number: validated.phone_number,
            is_active: true,
            is_staff: privileged,
            is_superuser: privileged,
            date_joined: Utc::now(),
        };

        debug!(phone = %user.phone_number, privileged, "Creating user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, username, full_name, phone_number, password_hash,
                is_active, is_staff, is_superuser, date_joined
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(user.phone_number.as_str())
        .bind(&password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.date_joined)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            let err = DbError::from(err);
            if err.is_unique_violation_on("users.phone_number") {
                return Err(duplicate_phone(&user.phone_number));
            }
            return Err(err.into());
        }

        info!(id = %user.id, is_superuser = user.is_superuser, "User created");
        Ok(user)
    }

    /// Looks up an account by phone number in any accepted input shape.
    pub async fn get_by_phone(&self, raw_phone: &str) -> CatalogResult<Option<User>> {
        Ok(self
            .fetch_row(raw_phone)
            .await?
            .map(UserRow::into_user)
            .transpose()?)
    }

    /// Changes the phone number, validating and normalizing the new one.
    pub async fn update_phone(&self, id: &str, raw_phone: &str) -> CatalogResult<User> {
        let phone = PhoneNumber::parse(raw_phone)?;

        let result = sqlx::query("UPDATE users SET phone_number = ?2 WHERE id = ?1")
            .bind(id)
            .bind(phone.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                return Err(DbError::not_found("User", id).into());
            }
            Ok(_) => {}
            Err(err) => {
                let err = DbError::from(err);
                if err.is_unique_violation_on("users.phone_number") {
                    return Err(duplicate_phone(&phone));
                }
                return Err(err.into());
            }
        }

        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into_user()?)
    }

    /// Returns the account when the phone and password match an active user.
    pub async fn verify_credentials(
        &self,
        raw_phone: &str,
        password: &str,
    ) -> CatalogResult<Option<User>> {
        let Some(row) = self.fetch_row(raw_phone).await? else {
            return Ok(None);
        };

        if !row.is_active || !verify_password(password, &row.password_hash) {
            debug!(phone = %row.phone_number, "Credential check failed");
            return Ok(None);
        }

        Ok(Some(row.into_user()?))
    }

    async fn fetch_row(&self, raw_phone: &str) -> Result<Option<UserRow>, DbError> {
        let sql = format!("SELECT {} FROM users WHERE phone_number = ?1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(normalize(raw_phone))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

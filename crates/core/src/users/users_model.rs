//! User domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string. Never leaves the service.
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Signup and login credentials.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl NewUser {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }

    pub fn validate(&self) -> Result<()> {
        let email = self.normalized_email();
        if email.is_empty() {
            return Err(Error::invalid_input("Email cannot be empty"));
        }
        if !email.contains('@') {
            return Err(Error::invalid_input("Invalid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::invalid_input(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

use log::{debug, info};
use std::sync::Arc;

use super::users_model::{normalize_email, NewUser, User};
use super::users_traits::{PasswordHasherTrait, UserRepositoryTrait, UserServiceTrait};
use crate::errors::{AuthError, DatabaseError, Error, Result};

const EMAIL_TAKEN: &str = "Email already registered";

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    hasher: Arc<dyn PasswordHasherTrait>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepositoryTrait>,
        hasher: Arc<dyn PasswordHasherTrait>,
    ) -> Self {
        Self { repository, hasher }
    }
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn signup(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let email = new_user.normalized_email();

        if self.repository.get_by_email(&email)?.is_some() {
            return Err(Error::invalid_input(EMAIL_TAKEN));
        }

        let password_hash = self.hasher.hash(&new_user.password)?;
        let user = self
            .repository
            .create(email, password_hash)
            .await
            .map_err(|e| match e {
                Error::Database(DatabaseError::UniqueViolation(_)) => {
                    Error::invalid_input(EMAIL_TAKEN)
                }
                other => other,
            })?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let Some(user) = self.repository.get_by_email(&email)? else {
            debug!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            debug!("Login attempt with wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }
}

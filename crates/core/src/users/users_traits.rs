use async_trait::async_trait;

use super::users_model::{NewUser, User};
use crate::errors::Result;

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Fails with a unique violation when the email is taken.
    async fn create(&self, email: String, password_hash: String) -> Result<User>;

    fn get_by_id(&self, user_id: &str) -> Result<User>;

    fn get_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Password hashing strategy, kept out of core so the host picks the algorithm.
pub trait PasswordHasherTrait: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;

    fn verify(&self, password: &str, password_hash: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn signup(&self, new_user: NewUser) -> Result<User>;

    /// Returns `AuthError::InvalidCredentials` for an unknown email or wrong password.
    async fn authenticate(&self, email: &str, password: &str) -> Result<User>;

    fn get_user(&self, user_id: &str) -> Result<User>;
}

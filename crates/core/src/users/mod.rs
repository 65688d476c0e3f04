//! Users module - registration and credential checks.

mod users_model;
mod users_service;
mod users_traits;


pub use users_model::{NewUser, User};
pub use users_service::UserService;
pub use users_traits::{PasswordHasherTrait, UserRepositoryTrait, UserServiceTrait};

//! Repository Traits
//!
//! Interfaces for the user store. Implementations live in the infra layer.

use crate::domain::entity::user::User;
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user.
    ///
    /// Must fail with `AuthError::EmailTaken` when the email already exists;
    /// the store's uniqueness check is the one that settles races.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by exact email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email is registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

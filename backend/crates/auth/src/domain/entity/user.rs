//! User Entity
//!
//! A user record as owned by the user store. The session core only reads it;
//! the sign-up flow is the single place one gets created.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{DisplayName, Email, UserId, UserPassword};

#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Unique login email
    pub email: Email,
    /// Display name
    pub name: Option<DisplayName>,
    /// Stored hash; `None` for accounts that cannot use credentials sign-in
    pub password_hash: Option<UserPassword>,
    /// Avatar URL
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: Email, name: Option<DisplayName>, password_hash: Option<UserPassword>) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            name,
            password_hash,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

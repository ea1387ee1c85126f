//! Identity
//!
//! The minimal authenticated-user projection. This is what gets embedded in
//! session tokens and handed to pages; it never carries the password hash.

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl Identity {
    /// Name for greetings, falling back to the email address
    pub fn display_label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.as_ref().map(|n| n.as_str().to_string()),
            image: user.image.clone(),
        }
    }
}

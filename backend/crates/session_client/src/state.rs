//! Session state as seen by the UI

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No answer from the server yet
    #[default]
    Loading,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub user: Option<SessionUser>,
    /// RFC 3339 expiry of the current session
    pub expires: Option<String>,
    /// User-facing message from the last failed action
    pub error: Option<String>,
}

impl SessionState {
    pub fn authenticated(user: SessionUser, expires: String) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
            expires: Some(expires),
            error: None,
        }
    }

    pub fn unauthenticated(error: Option<String>) -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            user: None,
            expires: None,
            error,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

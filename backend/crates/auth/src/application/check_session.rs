//! Check Session Use Case
//!
//! Resolves the session cookie value into an identity.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokenCodec;
use crate::domain::entity::identity::Identity;
use crate::error::{AuthError, AuthResult};

/// Session info output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub identity: Identity,
    pub expires_at: DateTime<Utc>,
}

/// Check session use case
pub struct CheckSessionUseCase {
    codec: SessionTokenCodec,
}

impl CheckSessionUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            codec: SessionTokenCodec::new(config),
        }
    }

    /// Check the token and return session info
    pub fn execute(&self, session_token: &str) -> AuthResult<SessionInfo> {
        let claims = self.codec.read(session_token).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            AuthError::SessionInvalid
        })?;

        Ok(SessionInfo {
            identity: claims.identity(),
            expires_at: claims.expires_at(),
        })
    }

    /// Missing or invalid token both mean "anonymous"
    pub fn identity(&self, session_token: Option<&str>) -> Option<Identity> {
        session_token
            .and_then(|token| self.execute(token).ok())
            .map(|info| info.identity)
    }
}

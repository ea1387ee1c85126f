//! API DTOs (Data Transfer Objects)

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{Provider, SessionInfo, SignUpOutput};
use crate::domain::entity::identity::Identity;

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
///
/// Missing fields deserialize as empty strings so they fail field validation
/// with the usual messages.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub message: String,
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub(crate) const SIGN_UP_SUCCESS_MESSAGE: &str = "アカウントが正常に作成されました";

impl From<SignUpOutput> for SignUpResponse {
    fn from(output: SignUpOutput) -> Self {
        Self {
            message: SIGN_UP_SUCCESS_MESSAGE.to_string(),
            id: output.id,
            name: output.name,
            email: output.email,
            created_at: output.created_at,
        }
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// Credentials sign-in response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub ok: bool,
    /// Where the client should navigate next
    pub url: String,
}

// ============================================================================
// Session
// ============================================================================

/// Session response (`null` when anonymous)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: Identity,
    pub expires: DateTime<Utc>,
}

impl From<SessionInfo> for SessionResponse {
    fn from(info: SessionInfo) -> Self {
        Self {
            user: info.identity,
            expires: info.expires_at,
        }
    }
}

// ============================================================================
// Providers
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub signin_url: String,
    pub callback_url: String,
}

/// Providers keyed by id
pub type ProvidersResponse = BTreeMap<&'static str, ProviderResponse>;

impl ProviderResponse {
    pub fn new(provider: Provider, base_path: &str) -> Self {
        Self {
            id: provider.id(),
            name: provider.name(),
            kind: provider.kind(),
            signin_url: format!("{base_path}/signin/{}", provider.id()),
            callback_url: format!("{base_path}/callback/{}", provider.id()),
        }
    }
}

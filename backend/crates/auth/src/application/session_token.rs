//! Session Token
//!
//! Stateless signed token carried in the session cookie.
//!
//! Format: `base64url(JSON claims) "." base64url(HMAC-SHA256(secret, payload))`
//!
//! The server keeps no session table: a token is valid when its signature
//! verifies and its `exp` lies in the future.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::error::{AuthError, AuthResult};

/// Why a token was not accepted. Callers treat every variant as "anonymous".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed session token")]
    Malformed,
    #[error("session token signature mismatch")]
    BadSignature,
    #[error("session token expired")]
    Expired,
}

/// Token payload (Unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// A freshly minted token
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and reads session tokens
#[derive(Clone)]
pub struct SessionTokenCodec {
    config: Arc<AuthConfig>,
}

impl SessionTokenCodec {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Mint a token for `identity`, valid for `session_max_age`
    pub fn issue(&self, identity: &Identity) -> AuthResult<SessionToken> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    pub fn issue_at(&self, identity: &Identity, now: i64) -> AuthResult<SessionToken> {
        let max_age = i64::try_from(self.config.session_max_age.as_secs())
            .map_err(|_| AuthError::Internal("session_max_age out of range".to_string()))?;

        let claims = SessionClaims {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            image: identity.image.clone(),
            iat: now,
            exp: now.saturating_add(max_age),
        };

        let json = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::Internal(format!("claims serialization failed: {e}")))?;
        let payload = to_base64url(&json);
        let signature = hmac_sha256(&self.config.session_secret, payload.as_bytes());

        Ok(SessionToken {
            value: format!("{}.{}", payload, to_base64url(&signature)),
            expires_at: claims.expires_at(),
        })
    }

    /// Validate a token against the current time
    pub fn read(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.read_at(token, Utc::now().timestamp())
    }

    pub fn read_at(&self, token: &str, now: i64) -> Result<SessionClaims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        if payload.is_empty() || signature.contains('.') {
            return Err(TokenError::Malformed);
        }

        let signature = from_base64url(signature).map_err(|_| TokenError::Malformed)?;
        if !verify_hmac_sha256(&self.config.session_secret, payload.as_bytes(), &signature) {
            return Err(TokenError::BadSignature);
        }

        let json = from_base64url(payload).map_err(|_| TokenError::Malformed)?;
        let claims: SessionClaims =
            serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Whether a valid token is old enough to be re-issued
    pub fn needs_refresh(&self, claims: &SessionClaims, now: i64) -> bool {
        match self.config.session_update_age {
            Some(update_age) => {
                let age = now.saturating_sub(claims.iat);
                age >= 0 && age as u64 >= update_age.as_secs()
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn codec() -> SessionTokenCodec {
        SessionTokenCodec::new(Arc::new(AuthConfig::with_random_secret()))
    }

    fn taro() -> Identity {
        Identity {
            id: "7d1c6a1e-0000-4000-8000-000000000001".to_string(),
            email: "taro@example.com".to_string(),
            name: Some("Taro".to_string()),
            image: None,
        }
    }

    #[test]
    fn test_issue_then_read() {
        let codec = codec();
        let token = codec.issue(&taro()).unwrap();
        let claims = codec.read(&token.value).unwrap();
        assert_eq!(claims.identity(), taro());
        assert_eq!(claims.expires_at(), token.expires_at);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec();
        let issued_at = 1_700_000_000;
        let token = codec.issue_at(&taro(), issued_at).unwrap();
        let max_age = AuthConfig::default().session_max_age.as_secs() as i64;

        assert!(codec.read_at(&token.value, issued_at + max_age - 1).is_ok());
        assert_eq!(
            codec.read_at(&token.value, issued_at + max_age),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_past_exp_invalid_even_with_bad_signature() {
        let codec = codec();
        let token = codec.issue_at(&taro(), 1_000).unwrap();
        let (payload, _) = token.value.split_once('.').unwrap();
        let forged = format!("{payload}.{}", to_base64url(&[0u8; 32]));
        assert!(codec.read(&forged).is_err());
        assert!(codec.read(&token.value).is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let token = codec.issue(&taro()).unwrap();
        let (_, signature) = token.value.split_once('.').unwrap();

        let mut claims = codec.read(&token.value).unwrap();
        claims.email = "admin@example.com".to_string();
        let payload = to_base64url(&serde_json::to_vec(&claims).unwrap());

        assert_eq!(
            codec.read(&format!("{payload}.{signature}")),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = codec().issue(&taro()).unwrap();
        assert_eq!(codec().read(&token.value), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec();
        for token in ["", "abc", ".sig", "a.b.c", "payload.!!!"] {
            assert_eq!(codec.read(token), Err(TokenError::Malformed), "token: {token}");
        }
    }

    #[test]
    fn test_signed_garbage_is_malformed() {
        let codec = codec();
        let payload = to_base64url(b"not json");
        let signature = hmac_sha256(&codec.config.session_secret, payload.as_bytes());
        let token = format!("{payload}.{}", to_base64url(&signature));
        assert_eq!(codec.read(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_needs_refresh() {
        let config = AuthConfig {
            session_update_age: Some(Duration::from_secs(3600)),
            ..AuthConfig::with_random_secret()
        };
        let codec = SessionTokenCodec::new(Arc::new(config));
        let claims = codec.read_at(&codec.issue_at(&taro(), 10_000).unwrap().value, 10_001).unwrap();

        assert!(!codec.needs_refresh(&claims, 10_000 + 3599));
        assert!(codec.needs_refresh(&claims, 10_000 + 3600));

        let no_sliding = SessionTokenCodec::new(Arc::new(AuthConfig {
            session_update_age: None,
            ..AuthConfig::with_random_secret()
        }));
        assert!(!no_sliding.needs_refresh(&claims, 10_000 + 1_000_000));
    }
}

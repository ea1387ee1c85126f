//! Sign In Use Case
//!
//! Credentials sign-in: verify, mint a session token, pick the landing page.

use std::sync::Arc;

use serde_json::Value;

use crate::application::config::AuthConfig;
use crate::application::session_token::{SessionToken, SessionTokenCodec};
use crate::application::verify_credentials::CredentialVerifier;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::UserRepository;
use crate::domain::services::resolve_post_auth_target;
use crate::error::{AuthError, AuthResult};

/// Sign in output
pub struct SignInOutput {
    pub identity: Identity,
    /// Session token for cookie
    pub token: SessionToken,
    /// Same-origin path to continue to
    pub redirect_to: String,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    verifier: Arc<CredentialVerifier<U>>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(verifier: Arc<CredentialVerifier<U>>, config: Arc<AuthConfig>) -> Self {
        Self { verifier, config }
    }

    /// `raw` is the submitted form: `{ email, password, callbackUrl? }`
    pub async fn execute(&self, raw: &Value) -> AuthResult<SignInOutput> {
        let identity = self
            .verifier
            .verify(raw)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        let token = SessionTokenCodec::new(self.config.clone()).issue(&identity)?;

        let requested = raw.get("callbackUrl").and_then(Value::as_str);
        let redirect_to = resolve_post_auth_target(
            requested,
            &self.config.base_url,
            &self.config.post_auth_redirect,
        );

        tracing::info!(user_id = %identity.id, redirect_to = %redirect_to, "User signed in");

        Ok(SignInOutput {
            identity,
            token,
            redirect_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::HashScheme;
    use crate::domain::entity::user::User;
    use crate::domain::value_object::{Email, RawPassword, UserPassword};
    use crate::infra::memory::InMemoryUserRepository;
    use serde_json::json;

    async fn use_case() -> SignInUseCase<InMemoryUserRepository> {
        let scheme = HashScheme::Bcrypt { cost: 4 };
        let config = Arc::new(AuthConfig {
            password_hashing: scheme,
            ..AuthConfig::with_random_secret()
        });

        let repo = InMemoryUserRepository::new();
        let raw = RawPassword::new("password123".to_string()).unwrap();
        repo.create(&User::new(
            Email::new("taro@example.com").unwrap(),
            None,
            Some(UserPassword::from_raw(&raw, scheme, None).unwrap()),
        ))
        .await
        .unwrap();

        let verifier = Arc::new(CredentialVerifier::new(Arc::new(repo), config.clone()));
        SignInUseCase::new(verifier, config)
    }

    #[tokio::test]
    async fn test_sign_in_issues_readable_token() {
        let sign_in = use_case().await;
        let output = sign_in
            .execute(&json!({"email": "taro@example.com", "password": "password123"}))
            .await
            .unwrap();

        assert_eq!(output.redirect_to, "/dashboard");
        let claims = SessionTokenCodec::new(sign_in.config.clone())
            .read(&output.token.value)
            .unwrap();
        assert_eq!(claims.identity(), output.identity);
    }

    #[tokio::test]
    async fn test_callback_url_honoured_when_same_origin() {
        let sign_in = use_case().await;
        let output = sign_in
            .execute(&json!({
                "email": "taro@example.com",
                "password": "password123",
                "callbackUrl": "/profile",
            }))
            .await
            .unwrap();
        assert_eq!(output.redirect_to, "/profile");

        let output = sign_in
            .execute(&json!({
                "email": "taro@example.com",
                "password": "password123",
                "callbackUrl": "https://evil.example/",
            }))
            .await
            .unwrap();
        assert_eq!(output.redirect_to, "/dashboard");
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let sign_in = use_case().await;
        let err = sign_in
            .execute(&json!({"email": "taro@example.com", "password": "wrong-password"}))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}

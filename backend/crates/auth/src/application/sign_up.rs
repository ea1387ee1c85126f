//! Sign Up Use Case
//!
//! Creates a new user account with a hashed password.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{DisplayName, Email, RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        // 検証順は name → email → password（最初の失敗だけ返す）
        let name = DisplayName::new(&input.name)?;
        let email = Email::new(input.email)?;
        let raw_password = RawPassword::new(input.password)?;

        // Cheap pre-check; the store's unique constraint still decides races
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let scheme = self.config.password_hashing;
        let pepper = self.config.password_pepper.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&raw_password, scheme, pepper.as_deref())
        })
        .await??;

        let user = User::new(email, Some(name), Some(password_hash));
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(SignUpOutput {
            id: user.user_id.to_string(),
            name: user.name.map(|n| n.as_str().to_string()).unwrap_or_default(),
            email: user.email.into_inner(),
            created_at: user.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::HashScheme;
    use crate::infra::memory::InMemoryUserRepository;

    fn use_case(repo: Arc<InMemoryUserRepository>) -> SignUpUseCase<InMemoryUserRepository> {
        let config = AuthConfig {
            password_hashing: HashScheme::Bcrypt { cost: 4 },
            ..AuthConfig::with_random_secret()
        };
        SignUpUseCase::new(repo, Arc::new(config))
    }

    fn input(name: &str, email: &str, password: &str) -> SignUpInput {
        SignUpInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let output = use_case(repo.clone())
            .execute(input("Taro", "taro@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(output.name, "Taro");
        assert_eq!(output.email, "taro@example.com");

        let stored = repo
            .find_by_email(&Email::new("taro@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id.to_string(), output.id);
        let hash = stored.password_hash.unwrap();
        assert!(!hash.as_str().contains("password123"));
        assert!(hash.verify(&RawPassword::new("password123".to_string()).unwrap(), None));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let sign_up = use_case(repo.clone());

        sign_up
            .execute(input("Taro", "taro@example.com", "password123"))
            .await
            .unwrap();
        let err = sign_up
            .execute(input("Taro", "taro@example.com", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_first_failing_field_reported() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let sign_up = use_case(repo.clone());

        let cases = [
            (input(" ", "bad", "short"), "name"),
            (input("Taro", "bad", "short"), "email"),
            (input("Taro", "taro@example.com", "short"), "password"),
        ];
        for (input, field) in cases {
            let err = sign_up.execute(input).await.unwrap_err();
            assert_eq!(err.to_app_error().field(), Some(field));
        }
        assert!(repo.is_empty().await);
    }
}

//! Verify Credentials Use Case
//!
//! Untyped credentials in, `Option<Identity>` out. Every failure (bad shape,
//! unknown email, wrong password, store outage) looks the same to the caller;
//! the reason only reaches the log.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Credentials, UserPassword};
use crate::error::AuthResult;

/// Credential verifier
///
/// Holds a lazily created decoy hash so lookups that find no usable hash
/// still pay for one verification.
pub struct CredentialVerifier<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    decoy: OnceLock<UserPassword>,
}

impl<U> CredentialVerifier<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            config,
            decoy: OnceLock::new(),
        }
    }

    /// Verify a raw credentials payload
    pub async fn verify(&self, raw: &Value) -> Option<Identity> {
        match self.try_verify(raw).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!(error = %e, "Credential verification failed");
                None
            }
        }
    }

    async fn try_verify(&self, raw: &Value) -> AuthResult<Option<Identity>> {
        let credentials = match Credentials::from_untyped(raw) {
            Ok(credentials) => credentials,
            Err(reason) => {
                tracing::debug!(%reason, "Credentials rejected before lookup");
                return Ok(None);
            }
        };

        let user = self.user_repo.find_by_email(&credentials.email).await?;

        let (hash, identity) = match user.as_ref().and_then(|u| u.password_hash.clone().map(|h| (h, u))) {
            Some((hash, user)) => (hash, Some(Identity::from(user))),
            None => (self.decoy_hash().await?, None),
        };

        let pepper = self.config.password_pepper.clone();
        let password = credentials.password;
        let matched =
            tokio::task::spawn_blocking(move || hash.verify(&password, pepper.as_deref())).await?;

        match identity {
            Some(identity) if matched => {
                tracing::info!(user_id = %identity.id, "Credentials verified");
                Ok(Some(identity))
            }
            Some(identity) => {
                tracing::warn!(user_id = %identity.id, "Wrong password");
                Ok(None)
            }
            None => {
                if user.is_some() {
                    tracing::warn!("Sign-in attempt for account without password");
                } else {
                    tracing::warn!("Sign-in attempt for unknown email");
                }
                Ok(None)
            }
        }
    }

    async fn decoy_hash(&self) -> AuthResult<UserPassword> {
        if let Some(decoy) = self.decoy.get() {
            return Ok(decoy.clone());
        }

        let scheme = self.config.password_hashing;
        let decoy = tokio::task::spawn_blocking(move || UserPassword::decoy(scheme)).await??;
        Ok(self.decoy.get_or_init(|| decoy).clone())
    }
}

//! Route Guard
//!
//! Per-request access decision. Fails closed: any token problem counts as
//! anonymous.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::session_token::{SessionToken, SessionTokenCodec};
use crate::domain::entity::identity::Identity;
use crate::domain::services::{
    GuardDecision, classify_path, is_excluded_path, sign_in_redirect,
};

/// Result of one guard evaluation
#[derive(Debug, Clone)]
pub struct GuardOutcome {
    pub decision: GuardDecision,
    /// Redirect target for the two redirect decisions
    pub location: Option<String>,
    /// Resolved identity (`None` for anonymous or excluded paths)
    pub identity: Option<Identity>,
    /// Re-issued token when sliding expiry kicked in
    pub refreshed: Option<SessionToken>,
    /// Whether the path was excluded and the token never read
    pub skipped: bool,
}

impl GuardOutcome {
    fn allow(identity: Option<Identity>, refreshed: Option<SessionToken>) -> Self {
        Self {
            decision: GuardDecision::Allow,
            location: None,
            identity,
            refreshed,
            skipped: false,
        }
    }
}

pub struct RouteGuard {
    config: Arc<AuthConfig>,
    codec: SessionTokenCodec,
}

impl RouteGuard {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            codec: SessionTokenCodec::new(config.clone()),
            config,
        }
    }

    pub fn evaluate(&self, path: &str, query: Option<&str>, token: Option<&str>) -> GuardOutcome {
        self.evaluate_at(path, query, token, Utc::now().timestamp())
    }

    pub fn evaluate_at(
        &self,
        path: &str,
        query: Option<&str>,
        token: Option<&str>,
        now: i64,
    ) -> GuardOutcome {
        if is_excluded_path(path, &self.config.guard_exclusions) {
            return GuardOutcome {
                skipped: true,
                ..GuardOutcome::allow(None, None)
            };
        }

        let claims = token.and_then(|token| match self.codec.read_at(token, now) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, path, "Ignoring session token");
                None
            }
        });

        let class = classify_path(path, &self.config.protected_routes, &self.config.public_routes);
        let decision = GuardDecision::decide(claims.is_some(), class);

        match decision {
            GuardDecision::Allow => {
                let Some(claims) = claims else {
                    return GuardOutcome::allow(None, None);
                };
                let identity = claims.identity();
                let refreshed = if self.codec.needs_refresh(&claims, now) {
                    match self.codec.issue_at(&identity, now) {
                        Ok(token) => Some(token),
                        Err(e) => {
                            tracing::error!(error = %e, "Session refresh failed");
                            None
                        }
                    }
                } else {
                    None
                };
                GuardOutcome::allow(Some(identity), refreshed)
            }
            GuardDecision::RedirectToSignin => {
                let original = match query {
                    Some(query) if !query.is_empty() => format!("{path}?{query}"),
                    _ => path.to_string(),
                };
                tracing::debug!(path, "Anonymous visit to protected route");
                GuardOutcome {
                    decision,
                    location: Some(sign_in_redirect(&self.config.sign_in_page, &original)),
                    identity: None,
                    refreshed: None,
                    skipped: false,
                }
            }
            GuardDecision::RedirectToHome => GuardOutcome {
                decision,
                location: Some(self.config.post_auth_redirect.clone()),
                identity: claims.map(|c| c.identity()),
                refreshed: None,
                skipped: false,
            },
        }
    }
}

//! Server-Side Session Accessor
//!
//! Extractors that give page handlers the current identity. The route guard
//! leaves its resolution in the request extensions; otherwise the cookie is
//! decoded here, once per request.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use platform::cookie::extract_cookie;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::services::sign_in_redirect;

/// Per-request session resolution cached in request extensions
#[derive(Debug, Clone)]
pub struct ResolvedSession(pub Option<Identity>);

/// Resolve the identity for this request, caching the result
pub fn current_identity(parts: &mut Parts, config: &Arc<AuthConfig>) -> Option<Identity> {
    if let Some(ResolvedSession(identity)) = parts.extensions.get::<ResolvedSession>() {
        return identity.clone();
    }

    let token = extract_cookie(&parts.headers, &config.session_cookie_name);
    let identity = CheckSessionUseCase::new(config.clone()).identity(token.as_deref());

    parts.extensions.insert(ResolvedSession(identity.clone()));
    identity
}

/// Current identity, `None` when anonymous. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AuthConfig>::from_ref(state);
        Ok(Self(current_identity(parts, &config)))
    }
}

/// Page-local gate: anonymous requests are redirected to the sign-in page
/// before the handler runs.
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequireIdentity
where
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AuthConfig>::from_ref(state);

        match current_identity(parts, &config) {
            Some(identity) => Ok(Self(identity)),
            None => {
                let original = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                Err(Redirect::temporary(&sign_in_redirect(
                    &config.sign_in_page,
                    original,
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SessionTokenCodec;
    use axum::http::{Request, StatusCode, header};
    use axum::response::IntoResponse;

    fn identity() -> Identity {
        Identity {
            id: "u-1".into(),
            email: "taro@example.com".into(),
            name: Some("Taro".into()),
            image: None,
        }
    }

    fn parts(cookie: Option<&str>, uri: &str) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_current_identity_from_cookie() {
        let config = Arc::new(AuthConfig::with_random_secret());
        let token = SessionTokenCodec::new(config.clone()).issue(&identity()).unwrap();
        let mut parts = parts(Some(&format!("auth_session={}", token.value)), "/profile");

        let CurrentIdentity(found) = CurrentIdentity::from_request_parts(&mut parts, &config)
            .await
            .unwrap();
        assert_eq!(found, Some(identity()));
        assert!(parts.extensions.get::<ResolvedSession>().is_some());
    }

    #[tokio::test]
    async fn test_cached_resolution_wins() {
        let config = Arc::new(AuthConfig::with_random_secret());
        let mut parts = parts(Some("auth_session=garbage"), "/profile");
        parts.extensions.insert(ResolvedSession(Some(identity())));

        assert_eq!(current_identity(&mut parts, &config), Some(identity()));
    }

    #[tokio::test]
    async fn test_require_identity_redirects_anonymous() {
        let config = Arc::new(AuthConfig::with_random_secret());
        let mut parts = parts(None, "/data?page=2");

        let rejection = RequireIdentity::from_request_parts(&mut parts, &config)
            .await
            .unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/signin?callbackUrl=%2Fdata%3Fpage%3D2"
        );
    }
}

//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::FromRef;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::error::app_error::AppError;
use serde_json::Value;
use std::sync::Arc;

use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, CredentialVerifier, SignInUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ProviderResponse, ProvidersResponse, SessionResponse, SignInResponse, SignUpRequest,
    SignUpResponse,
};

/// Mount point of the auth API
pub const AUTH_BASE_PATH: &str = "/api/auth";

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub verifier: Arc<CredentialVerifier<R>>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, config: Arc<AuthConfig>) -> Self {
        let repo = Arc::new(repo);
        Self {
            verifier: Arc::new(CredentialVerifier::new(repo.clone(), config.clone())),
            repo,
            config,
        }
    }
}

// R itself need not be Clone
impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            verifier: self.verifier.clone(),
        }
    }
}

impl<R> FromRef<AuthAppState<R>> for Arc<AuthConfig>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn from_ref(state: &AuthAppState<R>) -> Self {
        state.config.clone()
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    body: Bytes,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
{
    // JSON の構文エラーも 400 のフォームエラーとして返す
    let req: SignUpRequest = serde_json::from_slice(&body).map_err(AppError::from)?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await.map_err(AuthError::for_sign_up)?;

    Ok((StatusCode::CREATED, Json(SignUpResponse::from(output))))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/callback/credentials
///
/// Body is taken as untyped JSON; anything unparsable is just a failed sign-in.
pub async fn credentials_callback<R>(
    State(state): State<AuthAppState<R>>,
    body: Bytes,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
{
    let raw: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let use_case = SignInUseCase::new(state.verifier.clone(), state.config.clone());
    let output = use_case.execute(&raw).await?;

    let cookie = state
        .config
        .cookie()
        .build_set_cookie(&output.token.value, state.config.session_max_age.as_secs());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SignInResponse {
            ok: true,
            url: output.redirect_to,
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
///
/// Stateless sessions: clearing the cookie is the whole sign-out.
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: UserRepository + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.session_cookie_name);
    if let Some(identity) = CheckSessionUseCase::new(state.config.clone()).identity(token.as_deref()) {
        tracing::info!(user_id = %identity.id, "User signed out");
    }

    let cookie = state.config.cookie().build_delete_cookie();

    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/auth/session
pub async fn session<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> Json<Option<SessionResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.session_cookie_name);

    let session = token.and_then(|token| {
        CheckSessionUseCase::new(state.config.clone())
            .execute(&token)
            .ok()
    });

    Json(session.map(SessionResponse::from))
}

// ============================================================================
// Providers
// ============================================================================

/// GET /api/auth/providers
pub async fn providers<R>(State(state): State<AuthAppState<R>>) -> Json<ProvidersResponse>
where
    R: UserRepository + Send + Sync + 'static,
{
    let providers = state
        .config
        .providers
        .iter()
        .map(|p| (p.id(), ProviderResponse::new(*p, AUTH_BASE_PATH)))
        .collect();

    Json(providers)
}

//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router for any repository implementation
///
/// Routes are relative; mount under `/api/auth`.
pub fn auth_router<R>(repo: R, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, config);

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/callback/credentials", post(handlers::credentials_callback::<R>))
        .route("/session", get(handlers::session::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/providers", get(handlers::providers::<R>))
        .with_state(state)
}

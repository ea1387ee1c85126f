//! Router Assembly
//!
//! Pages + auth API behind the route guard. Transport layers (CORS, tracing)
//! are added in `main`.

use std::sync::Arc;

use auth::AuthConfig;
use auth::domain::repository::UserRepository;
use auth::middleware::route_guard;
use auth::presentation::AUTH_BASE_PATH;
use axum::Router;
use axum::middleware::from_fn_with_state;

use crate::pages;

pub fn build_router<R>(repo: R, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .merge(pages::router().with_state(config.clone()))
        .nest(AUTH_BASE_PATH, auth::auth_router(repo, config.clone()))
        .layer(from_fn_with_state(config, route_guard))
}

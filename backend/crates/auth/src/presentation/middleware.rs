//! Route Guard Middleware
//!
//! Runs the route guard on every request:
//!
//! ```ignore
//! router.layer(axum::middleware::from_fn_with_state(config, route_guard))
//! ```

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use platform::cookie::{extract_cookie, to_header_value};
use std::sync::Arc;

use crate::application::RouteGuard;
use crate::application::config::AuthConfig;
use crate::domain::services::GuardDecision;
use crate::presentation::session::ResolvedSession;

/// Middleware that enforces route classification
pub async fn route_guard(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = extract_cookie(req.headers(), &config.session_cookie_name);
    let outcome = RouteGuard::new(config.clone()).evaluate(
        req.uri().path(),
        req.uri().query(),
        token.as_deref(),
    );

    match (outcome.decision, outcome.location) {
        (GuardDecision::Allow, _) => {
            if !outcome.skipped {
                req.extensions_mut().insert(ResolvedSession(outcome.identity));
            }

            let mut response = next.run(req).await;

            if let Some(token) = outcome.refreshed {
                let cookie = config
                    .cookie()
                    .build_set_cookie(&token.value, config.session_max_age.as_secs());
                if let Some(value) = to_header_value(&cookie) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }

            response
        }
        (_, Some(location)) => Redirect::temporary(&location).into_response(),
        // redirect decisions always carry a location
        (_, None) => Redirect::temporary(&config.sign_in_page).into_response(),
    }
}

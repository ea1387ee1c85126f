//! Routing Policy
//!
//! ルート分類とガードの遷移表。すべて純粋関数で、I/O を持たない。

use url::{Url, form_urlencoded};

/// How a path is treated by the route guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires an identity
    Protected,
    /// Sign-in / sign-up pages; not for signed-in users
    PublicAuthOnly,
    Unclassified,
}

/// Terminal state of one guard evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToSignin,
    RedirectToHome,
}

impl GuardDecision {
    /// Transition table
    ///
    /// | authenticated | class          | decision         |
    /// |---------------|----------------|------------------|
    /// | true          | PublicAuthOnly | RedirectToHome   |
    /// | false         | Protected      | RedirectToSignin |
    /// | *             | *              | Allow            |
    pub fn decide(authenticated: bool, class: RouteClass) -> Self {
        match (authenticated, class) {
            (true, RouteClass::PublicAuthOnly) => GuardDecision::RedirectToHome,
            (false, RouteClass::Protected) => GuardDecision::RedirectToSignin,
            _ => GuardDecision::Allow,
        }
    }
}

/// Classify by raw prefix match. Protected wins when both lists match.
pub fn classify_path<S: AsRef<str>>(
    path: &str,
    protected: &[S],
    public_auth_only: &[S],
) -> RouteClass {
    let matches = |prefixes: &[S]| prefixes.iter().any(|p| path.starts_with(p.as_ref()));

    if matches(protected) {
        RouteClass::Protected
    } else if matches(public_auth_only) {
        RouteClass::PublicAuthOnly
    } else {
        RouteClass::Unclassified
    }
}

/// Paths the guard never inspects (API routes, static assets)
///
/// Segment-aware: `/api` covers `/api` and `/api/...` but not `/apiary`.
pub fn is_excluded_path<S: AsRef<str>>(path: &str, exclusions: &[S]) -> bool {
    exclusions.iter().any(|prefix| {
        let prefix = prefix.as_ref().trim_end_matches('/');
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    })
}

/// `/signin?callbackUrl=<original>` with the original path+query encoded
pub fn sign_in_redirect(sign_in_page: &str, original: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(original.as_bytes()).collect();
    format!("{sign_in_page}?callbackUrl={encoded}")
}

/// Where to send the user after a successful sign-in
///
/// A requested target (relative or absolute) is honoured only if it resolves
/// to `base_origin`'s origin. The result is always a path with its query and
/// fragment, never an absolute or protocol-relative URL.
pub fn resolve_post_auth_target(requested: Option<&str>, base_origin: &Url, default: &str) -> String {
    let Some(requested) = requested.map(str::trim).filter(|r| !r.is_empty()) else {
        return default.to_string();
    };

    let Ok(resolved) = base_origin.join(requested) else {
        return default.to_string();
    };

    if resolved.origin() != base_origin.origin() {
        return default.to_string();
    }

    // A leading `//` or `/\` would be read back as another host
    let path = resolved.path();
    if path.starts_with("//") || path.starts_with("/\\") {
        return default.to_string();
    }

    let mut target = path.to_string();
    if let Some(query) = resolved.query() {
        target.push('?');
        target.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        target.push('#');
        target.push_str(fragment);
    }
    target
}

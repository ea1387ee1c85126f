//! Application Configuration
//!
//! One `AuthConfig` is built at start-up and shared as `Arc<AuthConfig>`.

use std::time::Duration;

use platform::cookie::CookieConfig;
use url::Url;

/// Re-export from platform
pub use platform::cookie::SameSite;
pub use platform::password::{DEFAULT_BCRYPT_COST, HashScheme};

/// Sign-in methods offered to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Provider {
    /// Email + password checked against the user store
    Credentials,
}

impl Provider {
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Credentials => "credentials",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Credentials => "Credentials",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Provider::Credentials => "credentials",
        }
    }
}

/// Where session state lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStrategy {
    /// Signed, self-contained token in a cookie. Nothing is stored server-side.
    #[default]
    StatelessSignedToken,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Enabled sign-in providers
    pub providers: Vec<Provider>,
    /// Path prefixes that require an identity
    pub protected_routes: Vec<String>,
    /// Path prefixes only for anonymous visitors
    pub public_routes: Vec<String>,
    /// Path prefixes the guard ignores
    pub guard_exclusions: Vec<String>,
    pub session_strategy: SessionStrategy,
    /// Default landing page after sign-in
    pub post_auth_redirect: String,
    /// Sign-in page path
    pub sign_in_page: String,
    /// Public origin of the application; callback URLs must match it
    pub base_url: Url,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Token lifetime
    pub session_max_age: Duration,
    /// Re-issue tokens older than this (sliding expiry). `None` disables it.
    pub session_update_age: Option<Duration>,
    /// Session cookie name
    pub session_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Scheme for newly created hashes
    pub password_hashing: HashScheme,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            providers: vec![Provider::Credentials],
            protected_routes: strings(&["/dashboard", "/profile", "/data"]),
            public_routes: strings(&["/signin", "/signup"]),
            guard_exclusions: strings(&[
                "/api",
                "/_next/static",
                "/_next/image",
                "/static",
                "/favicon.ico",
            ]),
            session_strategy: SessionStrategy::StatelessSignedToken,
            post_auth_redirect: "/dashboard".to_string(),
            sign_in_page: "/signin".to_string(),
            base_url: Url::parse("http://localhost:3000").expect("static URL is valid"),
            session_secret: [0u8; 32],
            session_max_age: Duration::from_secs(30 * 24 * 3600), // 30 days
            session_update_age: Some(Duration::from_secs(24 * 3600)), // 1 day
            session_cookie_name: "auth_session".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            password_hashing: HashScheme::Argon2id,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Cookie attributes for the session cookie
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
        }
    }
}

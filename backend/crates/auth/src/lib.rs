//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, routing policy
//! - `application/` - Use cases: verify credentials, issue/read session tokens, guard routes
//! - `infra/` - User store implementations (PostgreSQL, in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router, guard middleware, page extractors
//!
//! ## Features
//! - Email + password sign-up and sign-in
//! - Stateless HMAC-signed session tokens in an HTTP-only cookie, with optional sliding expiry
//! - Route guard that redirects between protected pages and the sign-in page
//! - `CurrentIdentity` / `RequireIdentity` extractors for server-rendered pages
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (bcrypt hashes from older stores still verify)
//! - Failed sign-ins are indistinguishable to the caller; unknown emails still pay for one hash verification
//! - Post-sign-in redirects are restricted to the application's own origin

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, Provider};
pub use domain::entity::Identity;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod session {
    pub use crate::presentation::session::*;
}

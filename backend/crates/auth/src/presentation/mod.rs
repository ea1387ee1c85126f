//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, middleware and page extractors.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session;

pub use handlers::{AUTH_BASE_PATH, AuthAppState};
pub use middleware::route_guard;
pub use router::auth_router;
pub use session::{CurrentIdentity, RequireIdentity, ResolvedSession, current_identity};

//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod route_guard;
pub mod session_token;
pub mod sign_in;
pub mod sign_up;
pub mod verify_credentials;

// Re-exports
pub use check_session::{CheckSessionUseCase, SessionInfo};
pub use config::{AuthConfig, Provider, SessionStrategy};
pub use route_guard::{GuardOutcome, RouteGuard};
pub use session_token::{SessionClaims, SessionToken, SessionTokenCodec, TokenError};
pub use sign_in::{SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use verify_credentials::CredentialVerifier;

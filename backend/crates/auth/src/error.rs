//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Shown for every failed credentials sign-in, whatever the cause
pub const SIGN_IN_FAILED_MESSAGE: &str = "メールアドレスまたはパスワードが正しくありません";

pub(crate) const EMAIL_TAKEN_MESSAGE: &str = "このメールアドレスは既に使用されています";

pub(crate) const INTERNAL_MESSAGE: &str = "サーバー内部エラーが発生しました";

pub(crate) const SIGN_UP_FAILED_MESSAGE: &str = "アカウント作成中にエラーが発生しました";

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Field-level input validation failure
    #[error("Validation failed: {0}")]
    Validation(AppError),

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Credentials rejected (unknown email, wrong password, bad shape)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session token missing, malformed, forged or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Unexpected failure while creating an account
    #[error("Sign-up failed: {0}")]
    SignUpFailed(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 重複メールもフォーム上のエラーとして 400 で返す
            AuthError::Validation(_) | AuthError::EmailTaken => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AuthError::Database(_) | AuthError::Internal(_) | AuthError::SignUpFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(e) => e.kind(),
            AuthError::EmailTaken => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::Database(_) | AuthError::Internal(_) | AuthError::SignUpFailed(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to the user-facing AppError. Server-side details never leak.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(e) => {
                let err = AppError::new(e.kind(), e.message().to_string());
                match e.field() {
                    Some(field) => err.with_field(field.to_string()),
                    None => err,
                }
            }
            AuthError::EmailTaken => AppError::bad_request(EMAIL_TAKEN_MESSAGE).with_field("email"),
            AuthError::InvalidCredentials => AppError::unauthorized(SIGN_IN_FAILED_MESSAGE),
            AuthError::SessionInvalid => AppError::unauthorized("認証が必要です"),
            AuthError::Database(_) | AuthError::Internal(_) => AppError::internal(INTERNAL_MESSAGE),
            AuthError::SignUpFailed(_) => AppError::internal(SIGN_UP_FAILED_MESSAGE),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::SignUpFailed(msg) => {
                tracing::error!(message = %msg, "Sign-up failed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::EmailTaken => {
                tracing::info!("Sign-up rejected: email already registered");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl AuthError {
    /// Server-side failures during sign-up, reported with the sign-up message
    pub fn for_sign_up(self) -> Self {
        match self {
            AuthError::Database(e) => AuthError::SignUpFailed(e.to_string()),
            AuthError::Internal(msg) => AuthError::SignUpFailed(msg),
            other => other,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::Validation(err)
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("blocking task failed: {err}"))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),
}

//! Session Client
//!
//! Client-side view of the session for UI code: a `watch` channel that always
//! holds the latest [`SessionState`], plus sign-in / sign-out / refresh
//! actions against the auth API.
//!
//! ```ignore
//! let client = SessionClient::new("http://localhost:3000")?;
//! let mut rx = client.subscribe();
//! client.refresh().await;
//! while rx.changed().await.is_ok() {
//!     render(&rx.borrow());
//! }
//! ```

mod error;
mod state;

pub use error::ClientError;
pub use state::{SessionState, SessionStatus, SessionUser};

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;

/// Shown for every rejected sign-in
pub const SIGN_IN_FAILED_MESSAGE: &str = "メールアドレスまたはパスワードが正しくありません";

const SESSION_PATH: &str = "/api/auth/session";
const CREDENTIALS_PATH: &str = "/api/auth/callback/credentials";
const SIGN_OUT_PATH: &str = "/api/auth/signout";

#[derive(Deserialize)]
struct SessionPayload {
    user: SessionUser,
    expires: String,
}

#[derive(Deserialize)]
struct SignInPayload {
    url: String,
}

/// Reactive session handle
pub struct SessionClient {
    http: reqwest::Client,
    base_url: Url,
    state: watch::Sender<SessionState>,
}

impl SessionClient {
    /// `base_url` is the application origin, e.g. `http://localhost:3000`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        let (state, _) = watch::channel(SessionState::default());

        Ok(Self {
            http,
            base_url,
            state,
        })
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))
    }

    /// Re-read the session from the server
    ///
    /// Any failure leaves the client unauthenticated.
    pub async fn refresh(&self) -> SessionState {
        let next = match self.fetch_session().await {
            Ok(Some(payload)) => SessionState::authenticated(payload.user, payload.expires),
            Ok(None) => SessionState::unauthenticated(None),
            Err(e) => {
                tracing::warn!(error = %e, "Session refresh failed");
                SessionState::unauthenticated(Some(e.to_string()))
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    async fn fetch_session(&self) -> Result<Option<SessionPayload>, ClientError> {
        let response = self.http.get(self.endpoint(SESSION_PATH)?).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status().as_u16()));
        }
        Ok(response.json::<Option<SessionPayload>>().await?)
    }

    /// Submit credentials; returns the URL to continue to
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        callback_url: Option<&str>,
    ) -> Result<String, ClientError> {
        self.state.send_modify(|state| state.status = SessionStatus::Loading);

        let result = self.post_credentials(email, password, callback_url).await;

        match result {
            Ok(url) => {
                self.refresh().await;
                Ok(url)
            }
            Err(e) => {
                let message = match e {
                    ClientError::InvalidCredentials => SIGN_IN_FAILED_MESSAGE.to_string(),
                    ref other => other.to_string(),
                };
                self.state
                    .send_replace(SessionState::unauthenticated(Some(message)));
                Err(e)
            }
        }
    }

    async fn post_credentials(
        &self,
        email: &str,
        password: &str,
        callback_url: Option<&str>,
    ) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.endpoint(CREDENTIALS_PATH)?)
            .json(&json!({
                "email": email,
                "password": password,
                "callbackUrl": callback_url,
            }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<SignInPayload>().await?.url),
            StatusCode::UNAUTHORIZED => Err(ClientError::InvalidCredentials),
            status => Err(ClientError::UnexpectedStatus(status.as_u16())),
        }
    }

    /// Clear the session; the local state is unauthenticated afterwards even
    /// if the server could not be reached
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let result = async {
            let response = self.http.post(self.endpoint(SIGN_OUT_PATH)?).send().await?;
            if !response.status().is_success() {
                return Err(ClientError::UnexpectedStatus(response.status().as_u16()));
            }
            Ok::<(), ClientError>(())
        }
        .await;

        self.state.send_replace(SessionState::unauthenticated(None));
        result
    }
}

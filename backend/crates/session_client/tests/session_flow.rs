//! Drives the session client against a real auth router on an ephemeral port.

use std::sync::Arc;

use auth::config::HashScheme;
use auth::{AuthConfig, InMemoryUserRepository, auth_router};
use axum::Router;
use session_client::{SIGN_IN_FAILED_MESSAGE, ClientError, SessionClient, SessionStatus};

async fn serve() -> String {
    let config = AuthConfig {
        password_hashing: HashScheme::Bcrypt { cost: 4 },
        ..AuthConfig::development()
    };
    let app = Router::new().nest(
        "/api/auth",
        auth_router(InMemoryUserRepository::new(), Arc::new(config)),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

async fn sign_up(base: &str) {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/auth/signup"))
        .json(&serde_json::json!({
            "name": "Taro",
            "email": "taro@example.com",
            "password": "password123",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
}

#[tokio::test]
async fn test_sign_in_refresh_sign_out() {
    let base = serve().await;
    sign_up(&base).await;

    let client = SessionClient::new(&base).unwrap();
    let rx = client.subscribe();
    assert_eq!(rx.borrow().status, SessionStatus::Loading);

    assert_eq!(client.refresh().await.status, SessionStatus::Unauthenticated);

    let url = client
        .sign_in("taro@example.com", "password123", Some("/profile"))
        .await
        .unwrap();
    assert_eq!(url, "/profile");

    let state = rx.borrow().clone();
    assert_eq!(state.status, SessionStatus::Authenticated);
    assert_eq!(state.user.unwrap().email, "taro@example.com");

    client.sign_out().await.unwrap();
    assert_eq!(client.state().status, SessionStatus::Unauthenticated);
    assert_eq!(client.refresh().await.status, SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn test_failed_sign_in_message_is_generic() {
    let base = serve().await;
    sign_up(&base).await;

    let client = SessionClient::new(&base).unwrap();

    for (email, password) in [
        ("taro@example.com", "wrong-password"),
        ("hanako@example.com", "password123"),
    ] {
        let err = client.sign_in(email, password, None).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidCredentials));

        let state = client.state();
        assert_eq!(state.status, SessionStatus::Unauthenticated);
        assert_eq!(state.error.as_deref(), Some(SIGN_IN_FAILED_MESSAGE));
    }
}

#[tokio::test]
async fn test_unreachable_server_fails_closed() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SessionClient::new(&format!("http://{addr}")).unwrap();
    let state = client.refresh().await;
    assert_eq!(state.status, SessionStatus::Unauthenticated);
    assert!(state.error.is_some());
}

//! Server Configuration
//!
//! 環境変数からサーバー設定を組み立てる。`from_lookup` に読み出し関数を渡せるので、
//! テストではプロセスの環境変数に触れずに済む。

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::AuthConfig;
use auth::config::{DEFAULT_BCRYPT_COST, HashScheme};
use base64::Engine;
use base64::engine::general_purpose;
use thiserror::Error;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn invalid(key: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

/// Everything `main` needs to start the server
#[derive(Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory user store
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub auth: Arc<AuthConfig>,
}

impl ServerConfig {
    /// Read from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), cfg!(debug_assertions))
    }

    /// Build from an arbitrary key lookup. `development` relaxes the secret
    /// and cookie requirements.
    pub fn from_lookup<F>(lookup: F, development: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空文字は未設定として扱う
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| invalid("BIND_ADDR", e))?;

        let database_url = get("DATABASE_URL");

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let mut auth = AuthConfig::default();

        auth.session_secret = match get("AUTH_SECRET") {
            Some(secret) => parse_secret(&secret)?,
            None if development => {
                tracing::warn!("AUTH_SECRET not set, using a random secret (sessions end on restart)");
                AuthConfig::with_random_secret().session_secret
            }
            None => return Err(ConfigError::Missing("AUTH_SECRET")),
        };

        if let Some(base_url) = get("AUTH_URL") {
            auth.base_url = Url::parse(&base_url).map_err(|e| invalid("AUTH_URL", e))?;
        }

        if let Some(max_age) = get("AUTH_SESSION_MAX_AGE") {
            let secs = parse_secs("AUTH_SESSION_MAX_AGE", &max_age)?;
            if secs == 0 {
                return Err(invalid("AUTH_SESSION_MAX_AGE", "must be positive"));
            }
            auth.session_max_age = Duration::from_secs(secs);
        }

        if let Some(update_age) = get("AUTH_SESSION_UPDATE_AGE") {
            let secs = parse_secs("AUTH_SESSION_UPDATE_AGE", &update_age)?;
            auth.session_update_age = (secs > 0).then(|| Duration::from_secs(secs));
        }

        auth.cookie_secure = match get("AUTH_COOKIE_SECURE") {
            Some(value) => parse_bool("AUTH_COOKIE_SECURE", &value)?,
            None => !development,
        };

        auth.password_pepper = get("AUTH_PASSWORD_PEPPER").map(String::into_bytes);

        if let Some(scheme) = get("AUTH_PASSWORD_HASHING") {
            auth.password_hashing = parse_hash_scheme(&scheme)?;
        }

        Ok(Self {
            bind_addr,
            database_url,
            frontend_origins,
            auth: Arc::new(auth),
        })
    }
}

fn parse_secret(value: &str) -> Result<[u8; 32], ConfigError> {
    let bytes = general_purpose::STANDARD
        .decode(value)
        .map_err(|e| invalid("AUTH_SECRET", e))?;

    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| invalid("AUTH_SECRET", format!("expected 32 bytes, got {}", bytes.len())))
}

fn parse_secs(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|e| invalid(key, e))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(key, format!("not a boolean: {other}"))),
    }
}

fn parse_hash_scheme(value: &str) -> Result<HashScheme, ConfigError> {
    const KEY: &str = "AUTH_PASSWORD_HASHING";

    match value.split_once(':') {
        None if value.eq_ignore_ascii_case("argon2id") => Ok(HashScheme::Argon2id),
        None if value.eq_ignore_ascii_case("bcrypt") => Ok(HashScheme::Bcrypt {
            cost: DEFAULT_BCRYPT_COST,
        }),
        Some((name, cost)) if name.eq_ignore_ascii_case("bcrypt") => {
            let cost: u32 = cost.parse().map_err(|e| invalid(KEY, e))?;
            if !(4..=31).contains(&cost) {
                return Err(invalid(KEY, "bcrypt cost must be between 4 and 31"));
            }
            Ok(HashScheme::Bcrypt { cost })
        }
        _ => Err(invalid(KEY, format!("unknown scheme: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SECRET: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

    #[test]
    fn test_development_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]), true).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.database_url.is_none());
        assert_eq!(config.frontend_origins.len(), 2);
        assert!(!config.auth.cookie_secure);
        assert_ne!(config.auth.session_secret, [0u8; 32]);
    }

    #[test]
    fn test_release_requires_secret() {
        let err = ServerConfig::from_lookup(lookup(&[]), false).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AUTH_SECRET")));

        let config = ServerConfig::from_lookup(lookup(&[("AUTH_SECRET", SECRET)]), false).unwrap();
        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.session_secret[31], 31);
    }

    #[test]
    fn test_secret_must_be_32_bytes() {
        let err = ServerConfig::from_lookup(lookup(&[("AUTH_SECRET", "c2hvcnQ=")]), true).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "AUTH_SECRET", .. }));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(
            lookup(&[
                ("BIND_ADDR", "127.0.0.1:8080"),
                ("DATABASE_URL", "postgres://localhost/app"),
                ("AUTH_URL", "https://admin.example.com"),
                ("AUTH_SESSION_MAX_AGE", "3600"),
                ("AUTH_SESSION_UPDATE_AGE", "0"),
                ("AUTH_COOKIE_SECURE", "true"),
                ("AUTH_PASSWORD_PEPPER", "pepper"),
                ("AUTH_PASSWORD_HASHING", "bcrypt:10"),
                ("FRONTEND_ORIGINS", "https://admin.example.com, "),
            ]),
            true,
        )
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/app"));
        assert_eq!(config.auth.base_url.as_str(), "https://admin.example.com/");
        assert_eq!(config.auth.session_max_age, Duration::from_secs(3600));
        assert_eq!(config.auth.session_update_age, None);
        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.password_pepper.as_deref(), Some(&b"pepper"[..]));
        assert_eq!(config.auth.password_hashing, HashScheme::Bcrypt { cost: 10 });
        assert_eq!(config.frontend_origins, vec!["https://admin.example.com".to_string()]);
    }

    #[test]
    fn test_hash_scheme_parsing() {
        assert_eq!(parse_hash_scheme("argon2id").unwrap(), HashScheme::Argon2id);
        assert!(matches!(parse_hash_scheme("bcrypt").unwrap(), HashScheme::Bcrypt { .. }));
        assert!(parse_hash_scheme("bcrypt:3").is_err());
        assert!(parse_hash_scheme("md5").is_err());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")]), true).unwrap();
        assert!(config.database_url.is_none());
    }
}

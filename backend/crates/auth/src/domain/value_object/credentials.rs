//! Credentials Value Object
//!
//! Email/password pair parsed from an untyped request payload. Exists only
//! for the duration of a sign-in attempt.

use derive_more::Display;
use serde_json::Value;

use crate::domain::value_object::{email::Email, user_password::RawPassword};

/// Why a payload was not a credentials pair
///
/// Only ever logged; callers see the same rejection for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CredentialsRejection {
    #[display("payload is not an object")]
    NotAnObject,
    #[display("`{_0}` is missing or not a string")]
    MissingField(&'static str),
    #[display("email is malformed")]
    InvalidEmail,
    #[display("password is too short")]
    PasswordTooShort,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: RawPassword,
}

impl Credentials {
    /// Parse `{ "email": string, "password": string }`; other keys are ignored
    pub fn from_untyped(raw: &Value) -> Result<Self, CredentialsRejection> {
        let object = raw.as_object().ok_or(CredentialsRejection::NotAnObject)?;

        let email = object
            .get("email")
            .and_then(Value::as_str)
            .ok_or(CredentialsRejection::MissingField("email"))?;
        let password = object
            .get("password")
            .and_then(Value::as_str)
            .ok_or(CredentialsRejection::MissingField("password"))?;

        let email = Email::new(email).map_err(|_| CredentialsRejection::InvalidEmail)?;
        let password = RawPassword::new(password.to_string())
            .map_err(|_| CredentialsRejection::PasswordTooShort)?;

        Ok(Self { email, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload() {
        let creds = Credentials::from_untyped(&json!({
            "email": "taro@example.com",
            "password": "password123",
            "callbackUrl": "/profile",
        }))
        .unwrap();
        assert_eq!(creds.email.as_str(), "taro@example.com");
    }

    #[test]
    fn test_rejections() {
        let cases = [
            (json!(null), CredentialsRejection::NotAnObject),
            (json!(["taro@example.com", "password123"]), CredentialsRejection::NotAnObject),
            (json!({"password": "password123"}), CredentialsRejection::MissingField("email")),
            (json!({"email": 1, "password": "password123"}), CredentialsRejection::MissingField("email")),
            (json!({"email": "taro@example.com"}), CredentialsRejection::MissingField("password")),
            (json!({"email": "taro", "password": "password123"}), CredentialsRejection::InvalidEmail),
            (json!({"email": "taro@example.com", "password": "short"}), CredentialsRejection::PasswordTooShort),
        ];

        for (payload, expected) in cases {
            assert_eq!(
                Credentials::from_untyped(&payload).unwrap_err(),
                expected,
                "payload: {payload}"
            );
        }
    }
}

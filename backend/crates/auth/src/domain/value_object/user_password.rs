//! User Password Value Object
//!
//! Domain wrappers over `platform::password`:
//! - [`RawPassword`]: clear text from user input, length-checked, zeroized on drop
//! - [`UserPassword`]: stored hash (Argon2id PHC or bcrypt)

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashScheme, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

pub(crate) const PASSWORD_TOO_SHORT_MESSAGE: &str = "パスワードは8文字以上で入力してください";

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate (at least 8 characters) and wrap
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { .. } => {
                AppError::bad_request(PASSWORD_TOO_SHORT_MESSAGE).with_field("password")
            }
        })?;

        Ok(Self(clear_text))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for database storage
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password. CPU-bound; run on the blocking pool.
    pub fn from_raw(
        raw: &RawPassword,
        scheme: HashScheme,
        pepper: Option<&[u8]>,
    ) -> Result<Self, PasswordHashError> {
        raw.inner().hash(scheme, pepper).map(Self)
    }

    /// Parse a stored hash string
    pub fn from_db(stored: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_stored(stored).map(Self)
    }

    /// Hash of a random password, used to spend verification time when no
    /// real hash is available
    pub fn decoy(scheme: HashScheme) -> Result<Self, PasswordHashError> {
        HashedPassword::decoy(scheme).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Verify a raw password against this hash. CPU-bound.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: HashScheme = HashScheme::Bcrypt { cost: 4 };

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("password123".to_string()).is_ok());

        let err = RawPassword::new("1234567".to_string()).unwrap_err();
        assert_eq!(err.message(), PASSWORD_TOO_SHORT_MESSAGE);
        assert_eq!(err.field(), Some("password"));

        assert!(RawPassword::new(String::new()).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, FAST, None).unwrap();

        assert!(hashed.verify(&raw, None));

        let wrong = RawPassword::new("WrongPassword123!".to_string()).unwrap();
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_db_roundtrip() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, FAST, None).unwrap();

        let restored = UserPassword::from_db(hashed.as_str().to_string()).unwrap();
        assert!(restored.verify(&raw, None));
        assert!(UserPassword::from_db("plaintext-password").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        let debug = format!("{:?}", raw);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, FAST, None).unwrap();
        assert!(!format!("{:?}", hashed).contains(hashed.as_str()));
    }
}

//! Password Hashing and Verification
//!
//! - Argon2id hashing for new credentials (memory-hard, OWASP recommended)
//! - bcrypt hashing/verification for stores created by bcrypt-based stacks
//! - Zeroization of clear text
//! - Constant-time comparison (delegated to each algorithm's verifier)
//!
//! Stored hashes are self-describing: PHC strings (`$argon2id$...`) or
//! modular-crypt bcrypt strings (`$2b$12$...`). Verification picks the
//! algorithm from the stored string, so both can coexist in one table.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{random_bytes, to_base64url};

/// Minimum password length in Unicode scalar values
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt cost used when the bcrypt scheme is selected without a cost
pub const DEFAULT_BCRYPT_COST: u32 = 12;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Hashing scheme
// ============================================================================

/// Algorithm used for newly created hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashScheme {
    #[default]
    Argon2id,
    Bcrypt {
        cost: u32,
    },
}

/// Algorithm a stored hash was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Argon2,
    Bcrypt,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate length and wrap
    ///
    /// The password is kept byte-for-byte as typed so hashes created by other
    /// stacks keep verifying.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let char_count = raw.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            let mut raw = raw;
            raw.zeroize();
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        Ok(Self(raw))
    }

    /// Create without validation (tests only)
    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut combined = Zeroizing::new(self.as_bytes().to_vec());
        if let Some(p) = pepper {
            combined.extend_from_slice(p);
        }
        combined
    }

    /// Hash the password with the given scheme
    ///
    /// CPU-bound by design; call from a blocking context.
    pub fn hash(
        &self,
        scheme: HashScheme,
        pepper: Option<&[u8]>,
    ) -> Result<HashedPassword, PasswordHashError> {
        let password_bytes = self.peppered(pepper);

        let hash = match scheme {
            HashScheme::Argon2id => {
                let salt = SaltString::generate(OsRng);
                Argon2::default()
                    .hash_password(&password_bytes, &salt)
                    .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
                    .to_string()
            }
            HashScheme::Bcrypt { cost } => bcrypt::hash(&password_bytes[..], cost)
                .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?,
        };

        Ok(HashedPassword { hash })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Stored password hash (PHC or bcrypt modular-crypt string)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parse a stored hash string (e.g. from database)
    pub fn from_stored(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        if is_bcrypt_hash(&hash) {
            return Ok(Self { hash });
        }

        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Hash of a random throwaway password
    ///
    /// Verifying against it costs the same as a real verification and never
    /// succeeds for user input.
    pub fn decoy(scheme: HashScheme) -> Result<Self, PasswordHashError> {
        let throwaway = ClearTextPassword(to_base64url(&random_bytes(24)));
        throwaway.hash(scheme, None)
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        if is_bcrypt_hash(&self.hash) {
            HashAlgorithm::Bcrypt
        } else {
            HashAlgorithm::Argon2
        }
    }

    /// Verify a password against this hash
    ///
    /// `pepper` must match the one used during hashing. Malformed hashes
    /// never verify.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let password_bytes = password.peppered(pepper);

        match self.algorithm() {
            HashAlgorithm::Bcrypt => bcrypt::verify(&password_bytes[..], &self.hash).unwrap_or(false),
            HashAlgorithm::Argon2 => {
                let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
                    return false;
                };
                Argon2::default()
                    .verify_password(&password_bytes, &parsed_hash)
                    .is_ok()
            }
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// `$2a$`, `$2b$`, `$2x$`, `$2y$` followed by cost and 53 chars of salt+hash
fn is_bcrypt_hash(s: &str) -> bool {
    s.len() == 60
        && ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| s.starts_with(prefix))
        && bcrypt_cost(s).is_some()
}

fn bcrypt_cost(s: &str) -> Option<u32> {
    s.get(4..6)?.parse().ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FAST_BCRYPT: HashScheme = HashScheme::Bcrypt { cost: 4 };

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert_eq!(
            result.unwrap_err(),
            PasswordPolicyError::TooShort { min: 8, actual: 5 }
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 8 multibyte characters
        assert!(ClearTextPassword::new("パスワード安全だ".to_string()).is_ok());
        // 7 multibyte characters (21 bytes)
        assert!(ClearTextPassword::new("パスワード安全".to_string()).is_err());
    }

    #[test]
    fn test_common_passwords_are_accepted() {
        assert!(ClearTextPassword::new("password123".to_string()).is_ok());
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let password = ClearTextPassword::new_unchecked("TestPassword123!".to_string());
        let hashed = password.hash(HashScheme::Argon2id, None).unwrap();
        assert_eq!(hashed.algorithm(), HashAlgorithm::Argon2);
        assert!(hashed.as_str().starts_with("$argon2id$"));

        assert!(hashed.verify(&password, None));

        let wrong = ClearTextPassword::new_unchecked("WrongPassword123!".to_string());
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let password = ClearTextPassword::new_unchecked("password123".to_string());
        let hashed = password.hash(FAST_BCRYPT, None).unwrap();
        assert_eq!(hashed.algorithm(), HashAlgorithm::Bcrypt);

        let restored = HashedPassword::from_stored(hashed.as_str()).unwrap();
        assert!(restored.verify(&password, None));

        let wrong = ClearTextPassword::new_unchecked("password124".to_string());
        assert!(!restored.verify(&wrong, None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = ClearTextPassword::new_unchecked("TestPassword123!".to_string());
        let pepper = b"my_secret_pepper";
        let hashed = password.hash(FAST_BCRYPT, Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_from_stored_rejects_garbage() {
        assert!(HashedPassword::from_stored("not_a_valid_hash").is_err());
        assert!(HashedPassword::from_stored("$2b$12$tooshort").is_err());
    }

    #[test]
    fn test_decoy_never_matches() {
        let decoy = HashedPassword::decoy(FAST_BCRYPT).unwrap();
        let password = ClearTextPassword::new_unchecked("password123".to_string());
        assert!(!decoy.verify(&password, None));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new_unchecked("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}

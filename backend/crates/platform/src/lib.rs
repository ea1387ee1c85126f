//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64url)
//! - Password hashing (Argon2id, bcrypt verification for migrated stores)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;

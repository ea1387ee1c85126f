//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate holds the vocabulary every backend crate agrees on:
//! - Unified error type ([`error::app_error::AppError`]) and its classification
//! - Typed ID wrappers
//!
//! Anything placed here must mean the same thing in every crate that imports it.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

pub use error::app_error::{AppError, AppResult};
pub use error::kind::ErrorKind;

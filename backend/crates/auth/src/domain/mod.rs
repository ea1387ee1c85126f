//! Domain Layer
//!
//! Entities, value objects, repository traits and the pure routing policy.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{Identity, User};
pub use repository::UserRepository;

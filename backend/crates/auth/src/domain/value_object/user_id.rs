//! User ID
//!
//! UUID v4 wrapper shared with the kernel so every crate names users the same way.

pub use kernel::id::UserId;

//! Value Object Module

pub mod credentials;
pub mod display_name;
pub mod email;
pub mod user_id;
pub mod user_password;

pub use credentials::{Credentials, CredentialsRejection};
pub use display_name::DisplayName;
pub use email::Email;
pub use user_id::UserId;
pub use user_password::{RawPassword, UserPassword};

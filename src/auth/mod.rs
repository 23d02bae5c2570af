//! Authentication and User Management
//!
//! User accounts, bcrypt password hashing, JWT session tokens, and the
//! signup/login/me/nickname handlers. The rest of the service only ever
//! sees an authenticated `user_id`; everything in this module exists to
//! produce that value trustworthily.

/// User model and database operations
pub mod users;

/// JWT token creation and verification
pub mod sessions;

/// HTTP handlers for auth and nickname endpoints
pub mod handlers;

pub use handlers::{change_nickname, get_me, login, signup, verify_nickname};
pub use users::User;

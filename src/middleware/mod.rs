//! Request Middleware
//!
//! Currently only JWT authentication.

/// JWT authentication middleware and the `AuthUser` extractor
pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};

//! Error Module
//!
//! Defines the service-wide error taxonomy and its conversion to HTTP
//! responses. Every error kind maps to a distinct, stable status code so
//! the boundary layer never has to inspect message text.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - ServiceError definition and status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::ServiceError;

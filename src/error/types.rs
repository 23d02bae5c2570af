/**
 * Service Error Types
 *
 * One error enum covers every operation the engine and the handlers
 * expose. Failure kinds are deliberately coarse:
 *
 * - `NotFound`   - a referenced collection/bookmark/invite is absent
 * - `Forbidden`  - a non-owner attempted a gated mutation
 * - `Conflict`   - a duplicate friend edge, nickname, or an exhausted
 *                  location dedup race
 * - `Validation` - a malformed field the handler layer caught
 * - `Database`   - an underlying sqlx failure
 * - `Internal`   - hashing/token failures and other server faults
 *
 * Deterministic failures (`NotFound`, `Forbidden`) are never retried.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Service-wide error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller does not own the entity it tried to mutate
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A uniqueness rule was violated
    #[error("conflict: {0}")]
    Conflict(String),

    /// A request field failed validation
    #[error("validation failed: {0}")]
    Validation(String),

    /// Database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server fault (hashing, token signing, ...)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message
    ///
    /// Database and internal errors are not leaked to the client; the
    /// full error is logged server-side instead.
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

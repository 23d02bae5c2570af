/**
 * Authentication Middleware
 *
 * Protects routes that require an authenticated caller. Extracts and
 * verifies the JWT from the Authorization header and attaches the caller's
 * identity to request extensions. Downstream code trusts `user_id`
 * unconditionally; every further check (ownership, visibility) is a
 * cross-entity invariant, not an authentication concern.
 */

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::auth::users::get_user_by_id;
use crate::server::state::AppState;

/// Authenticated caller identity extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub nickname: String,
}

/// Authentication middleware
///
/// 1. Extracts the `Bearer` token from the Authorization header
/// 2. Verifies the token signature and expiry
/// 3. Confirms the user still exists
/// 4. Attaches [`AuthenticatedUser`] to request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            StatusCode::UNAUTHORIZED
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        StatusCode::UNAUTHORIZED
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::error!("Invalid user ID in token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    // Tokens outlive accounts; reject tokens for deleted users
    if let Err(e) = verify_user_exists(&app_state.db_pool, user_id).await {
        tracing::warn!("User not found in database: {:?}", e);
        return Err(StatusCode::UNAUTHORIZED);
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        nickname: claims.nickname,
    });

    Ok(next.run(request).await)
}

async fn verify_user_exists(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    get_user_by_id(pool, user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    Ok(())
}

/// Axum extractor for the authenticated user
///
/// Handlers behind [`auth_middleware`] take `AuthUser(user): AuthUser` to
/// receive the caller identity.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                StatusCode::UNAUTHORIZED
            })?;

        Ok(AuthUser(user))
    }
}

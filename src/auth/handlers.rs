/**
 * Authentication HTTP Handlers
 *
 * Signup, login, current-user lookup, and the nickname endpoints.
 *
 * # Validation
 *
 * - Nickname: 1-30 characters, no surrounding whitespace, unique
 * - Email: must contain '@' (basic check)
 * - Password: at least 8 characters
 *
 * Passwords are hashed with bcrypt and never returned in responses.
 */

use axum::{extract::State, Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::sessions::create_token;
use crate::auth::users::{
    create_user, get_user_by_email, get_user_by_id, nickname_exists, update_nickname,
};
use crate::error::ServiceError;
use crate::middleware::auth::AuthUser;

/// Signup request body
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub nickname: String,
    pub email: String,
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub nickname: String,
    pub email: String,
}

/// Token plus user info, returned by signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Nickname request body (verify and change)
#[derive(Debug, Deserialize)]
pub struct NicknameRequest {
    pub nickname: String,
}

fn validate_nickname(nickname: &str) -> Result<(), ServiceError> {
    let len = nickname.chars().count();
    if len == 0 || len > 30 || nickname.trim() != nickname {
        return Err(ServiceError::validation(
            "nickname must be 1-30 characters without surrounding whitespace",
        ));
    }
    Ok(())
}

/// `POST /api/auth/signup`
pub async fn signup(
    State(pool): State<PgPool>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    tracing::info!("Signup request for nickname: {}", request.nickname);

    validate_nickname(&request.nickname)?;

    if !request.email.contains('@') {
        return Err(ServiceError::validation("invalid email format"));
    }
    if request.password.len() < 8 {
        return Err(ServiceError::validation(
            "password must be at least 8 characters",
        ));
    }

    if nickname_exists(&pool, &request.nickname).await? {
        return Err(ServiceError::conflict("nickname already taken"));
    }
    if get_user_by_email(&pool, &request.email).await?.is_some() {
        return Err(ServiceError::conflict("email already registered"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| ServiceError::internal(format!("failed to hash password: {e}")))?;

    let user = create_user(&pool, &request.nickname, &request.email, &password_hash).await?;

    let token = create_token(user.id, user.nickname.clone())
        .map_err(|e| ServiceError::internal(format!("failed to create token: {e}")))?;

    tracing::info!("User created: {} ({})", user.nickname, user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id.to_string(),
            nickname: user.nickname,
            email: user.email,
        },
    }))
}

/// `POST /api/auth/login`
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let user = get_user_by_email(&pool, &request.email)
        .await?
        .ok_or_else(|| ServiceError::forbidden("invalid email or password"))?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| ServiceError::internal(format!("failed to verify password: {e}")))?;
    if !valid {
        return Err(ServiceError::forbidden("invalid email or password"));
    }

    let token = create_token(user.id, user.nickname.clone())
        .map_err(|e| ServiceError::internal(format!("failed to create token: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id.to_string(),
            nickname: user.nickname,
            email: user.email,
        },
    }))
}

/// `GET /api/auth/me`
pub async fn get_me(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserResponse>, ServiceError> {
    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user not found"))?;

    Ok(Json(UserResponse {
        id: user.id.to_string(),
        nickname: user.nickname,
        email: user.email,
    }))
}

/// `POST /api/users/verify-nickname`
///
/// Pre-flight duplicate check before a nickname change.
pub async fn verify_nickname(
    State(pool): State<PgPool>,
    Json(request): Json<NicknameRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    validate_nickname(&request.nickname)?;

    if nickname_exists(&pool, &request.nickname).await? {
        return Err(ServiceError::conflict("nickname already taken"));
    }

    Ok(Json(serde_json::json!({ "nickname": request.nickname })))
}

/// `PATCH /api/users/me/nickname`
pub async fn change_nickname(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Json(request): Json<NicknameRequest>,
) -> Result<Json<UserResponse>, ServiceError> {
    validate_nickname(&request.nickname)?;

    if nickname_exists(&pool, &request.nickname).await? {
        return Err(ServiceError::conflict("nickname already taken"));
    }

    let user = update_nickname(&pool, auth.user_id, &request.nickname).await?;

    Ok(Json(UserResponse {
        id: user.id.to_string(),
        nickname: user.nickname,
        email: user.email,
    }))
}

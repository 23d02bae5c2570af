//! Friend HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::friends::graph;
use crate::friends::types::{FriendEntry, FriendInvite, SendInviteRequest};
use crate::middleware::auth::AuthUser;
use crate::pagination::{Page, Pagination};

/// Query parameters for friend list endpoints
#[derive(Debug, Deserialize)]
pub struct FriendListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// `POST /api/friends/invite`
pub async fn send_invite(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<SendInviteRequest>,
) -> Result<Json<FriendInvite>, ServiceError> {
    let invite = graph::send_invite(&pool, user.user_id, request.friend_id).await?;
    Ok(Json(invite))
}

/// `POST /api/friends/invites/{id}/accept`
pub async fn accept_invite(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(invite_id): Path<Uuid>,
) -> Result<Json<FriendInvite>, ServiceError> {
    let invite = graph::accept_invite(&pool, user.user_id, invite_id).await?;
    Ok(Json(invite))
}

/// `DELETE /api/friends/invites/{id}`
pub async fn remove_invite(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(invite_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    graph::remove_invite(&pool, user.user_id, invite_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/friends`
pub async fn list_friends(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Query(params): Query<FriendListParams>,
) -> Result<Json<Page<FriendEntry>>, ServiceError> {
    let pagination = Pagination::new(params.page, params.limit);
    let page = graph::list_friends(&pool, user.user_id, pagination).await?;
    Ok(Json(page))
}

/// `GET /api/friends/invites/received`
pub async fn list_received_invites(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Query(params): Query<FriendListParams>,
) -> Result<Json<Page<FriendInvite>>, ServiceError> {
    let pagination = Pagination::new(params.page, params.limit);
    let page = graph::list_received_invites(&pool, user.user_id, pagination).await?;
    Ok(Json(page))
}

/// `GET /api/friends/invites/sent`
pub async fn list_sent_invites(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Query(params): Query<FriendListParams>,
) -> Result<Json<Page<FriendInvite>>, ServiceError> {
    let pagination = Pagination::new(params.page, params.limit);
    let page = graph::list_sent_invites(&pool, user.user_id, pagination).await?;
    Ok(Json(page))
}

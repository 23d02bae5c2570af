//! Collection HTTP Handlers
//!
//! Thin handlers: field-level validation happens here, cross-entity
//! invariants (ownership, existence, dedup) live in the engine.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::collections::engine;
use crate::collections::types::{
    BookmarkCollection, BookmarkWithLocation, CreateCollectionRequest, UpdateCollectionRequest,
    Visibility,
};
use crate::error::ServiceError;
use crate::middleware::auth::AuthUser;
use crate::pagination::{Page, Pagination};

/// Query parameters for listing the caller's own collections
#[derive(Debug, Deserialize)]
pub struct ListMyCollectionsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub visibility: Option<Visibility>,
}

/// Query parameters for listing another user's collections
#[derive(Debug, Deserialize)]
pub struct ListUserCollectionsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// `POST /api/users/me/collections`
pub async fn create_collection(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateCollectionRequest>,
) -> Result<Json<BookmarkCollection>, ServiceError> {
    request.validate()?;
    let collection = engine::create_collection(&pool, user.user_id, request).await?;
    Ok(Json(collection))
}

/// `PATCH /api/users/me/collections/{id}`
pub async fn update_collection(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(collection_id): Path<Uuid>,
    Json(request): Json<UpdateCollectionRequest>,
) -> Result<Json<BookmarkCollection>, ServiceError> {
    request.validate()?;
    let collection =
        engine::update_collection(&pool, user.user_id, collection_id, request).await?;
    Ok(Json(collection))
}

/// `DELETE /api/users/me/collections/{id}`
pub async fn delete_collection(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(collection_id): Path<Uuid>,
) -> Result<Json<BookmarkCollection>, ServiceError> {
    let collection = engine::delete_collection(&pool, user.user_id, collection_id).await?;
    Ok(Json(collection))
}

/// `GET /api/users/me/collections`
pub async fn list_my_collections(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListMyCollectionsParams>,
) -> Result<Json<Page<BookmarkCollection>>, ServiceError> {
    let pagination = Pagination::new(params.page, params.limit);
    let page =
        engine::list_own_collections(&pool, user.user_id, params.visibility, pagination).await?;
    Ok(Json(page))
}

/// `GET /api/users/{id}/collections`
pub async fn list_user_collections(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Path(owner_id): Path<Uuid>,
    Query(params): Query<ListUserCollectionsParams>,
) -> Result<Json<Page<BookmarkCollection>>, ServiceError> {
    let pagination = Pagination::new(params.page, params.limit);
    let page =
        engine::list_user_collections(&pool, viewer.user_id, owner_id, pagination).await?;
    Ok(Json(page))
}

/// `GET /api/users/me/collections/{id}/bookmarks`
pub async fn list_collection_bookmarks(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(collection_id): Path<Uuid>,
) -> Result<Json<Vec<BookmarkWithLocation>>, ServiceError> {
    let bookmarks =
        engine::list_collection_bookmarks(&pool, user.user_id, collection_id).await?;
    Ok(Json(bookmarks))
}

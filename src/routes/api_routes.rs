/**
 * API Route Handlers
 *
 * This module wires the HTTP endpoints to their handlers, split into a
 * public group and a protected group. The protected group carries the JWT
 * middleware as a route layer so the middleware only runs for routes that
 * actually exist (unknown paths still fall through to the 404 handler
 * rather than a 401).
 */

use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::auth::handlers::{change_nickname, get_me, login, signup, verify_nickname};
use crate::collections::handlers::{
    create_collection, delete_collection, list_collection_bookmarks, list_my_collections,
    list_user_collections, update_collection,
};
use crate::friends::handlers::{
    accept_invite, list_friends, list_received_invites, list_sent_invites, remove_invite,
    send_invite,
};
use crate::middleware::auth::auth_middleware;
use crate::server::state::AppState;

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/users/verify-nickname", post(verify_nickname))
}

/// Routes behind the JWT middleware
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Account endpoints
        .route("/api/auth/me", get(get_me))
        .route("/api/users/me/nickname", patch(change_nickname))
        // Collection endpoints
        .route(
            "/api/users/me/collections",
            post(create_collection).get(list_my_collections),
        )
        .route(
            "/api/users/me/collections/{id}",
            patch(update_collection).delete(delete_collection),
        )
        .route(
            "/api/users/me/collections/{id}/bookmarks",
            get(list_collection_bookmarks),
        )
        .route("/api/users/{id}/collections", get(list_user_collections))
        // Friend graph endpoints
        .route("/api/friends", get(list_friends))
        .route("/api/friends/invite", post(send_invite))
        .route("/api/friends/invites/received", get(list_received_invites))
        .route("/api/friends/invites/sent", get(list_sent_invites))
        .route("/api/friends/invites/{id}/accept", post(accept_invite))
        .route(
            "/api/friends/invites/{id}",
            axum::routing::delete(remove_invite),
        )
        .route_layer(from_fn_with_state(state, auth_middleware))
}

/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * the public and protected route groups into a single Axum router.
 *
 * # Route Order
 *
 * 1. Public routes (signup, login, nickname verification)
 * 2. Protected routes (JWT middleware as a route layer)
 * 3. Fallback handler (404)
 *
 * Request tracing wraps the whole router.
 */

use axum::http::StatusCode;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::routes::api_routes::{protected_routes, public_routes};
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(app_state.clone()))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/**
 * Server Initialization
 *
 * Builds the Axum application: loads the database pool, constructs the
 * shared state, and assembles the router.
 */

use axum::Router;

use crate::routes::router::create_router;
use crate::server::config::load_database;
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails if the database cannot be reached or migrated; the server has no
/// degraded mode without its stores.
pub async fn create_app() -> Result<Router, sqlx::Error> {
    tracing::info!("Initializing placemark backend server");

    let db_pool = load_database().await?;

    let app_state = AppState { db_pool };

    Ok(create_router(app_state))
}

/**
 * Application State Management
 *
 * `AppState` is the central state container shared across all request
 * handlers. The only long-lived state this service carries is the database
 * connection pool: every operation runs to completion within a single
 * request and there are no background tasks or in-memory caches.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    ///
    /// The pool is cheap to clone (internally reference-counted) and
    /// thread-safe, so handlers may extract it directly.
    pub db_pool: PgPool,
}

/// Allow handlers to extract the pool without the full `AppState`
impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

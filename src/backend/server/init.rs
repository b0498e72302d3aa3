/**
 * Server Initialization
 *
 * Builds `AppState` from `Settings` and wraps it in the router.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL and run migrations if `DATABASE_URL` is set
 * 2. Pick the stores: `PgStore` over the pool, else one shared `MemoryStore`
 * 3. Create the Token Service, Access Policy, Connection Registry and
 *    Notification Relay
 * 4. Create the router with all routes and middleware
 *
 * A missing or unreachable database is not fatal; the server runs on
 * in-memory stores and says so in the log.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::routes::create_router;
use crate::backend::server::config::{load_database, Settings};
use crate::backend::server::state::AppState;
use crate::backend::storage::{MemoryStore, PgStore};

/// Create and configure the Axum application
pub async fn create_app(settings: Settings) -> Router {
    tracing::info!("Initializing {} backend server", settings.project_name);

    let db_pool = load_database(settings.database_url.as_deref()).await;

    let state = match &db_pool {
        Some(pool) => {
            let store = Arc::new(PgStore::new(pool.clone()));
            AppState::with_stores(settings, store.clone(), store.clone(), store, db_pool.clone())
        }
        None => {
            tracing::warn!("Running on in-memory stores; data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            AppState::with_stores(settings, store.clone(), store.clone(), store, None)
        }
    };

    build_app(state)
}

/// Router over an already assembled state
pub fn build_app(state: AppState) -> Router {
    let app = create_router(state);
    tracing::info!("Router configured");
    app
}

//! Route definitions.

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Bonds, with and without the trailing slash
        .route(
            "/bonds/",
            get(handlers::list_bonds).post(handlers::create_bond),
        )
        .route(
            "/bonds",
            get(handlers::list_bonds).post(handlers::create_bond),
        )
        .with_state(state)
}

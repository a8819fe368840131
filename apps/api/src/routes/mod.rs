pub mod diagnostics;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation_handlers;
use crate::profile::handlers as profile_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/diagnostics", get(diagnostics::diagnostics_handler))
        // Generation API
        .route("/api/generate", post(generation_handlers::handle_generate))
        // Profile API
        .route(
            "/api/profile",
            get(profile_handlers::handle_get_profile)
                .post(profile_handlers::handle_upsert_profile)
                .delete(profile_handlers::handle_delete_profile),
        )
        .with_state(state)
}

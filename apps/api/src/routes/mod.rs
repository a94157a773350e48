pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::profile::handlers as profile_handlers;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tailoring API
        .route(
            "/api/v1/tailor-resume",
            post(tailoring_handlers::handle_tailor_resume),
        )
        // Profile history
        .route(
            "/api/v1/profiles/:user_id/resumes",
            get(profile_handlers::handle_list_stored_resumes),
        )
        .with_state(state)
}

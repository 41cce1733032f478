pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommend::handlers as recommend_handlers;
use crate::session::handlers as session_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless pipeline
        .route(
            "/api/v1/recommendations",
            post(recommend_handlers::handle_fetch_recommendations),
        )
        .route(
            "/api/v1/recommendations/email-draft",
            post(recommend_handlers::handle_email_draft),
        )
        // Sessions (accumulation, load-more, likes)
        .route(
            "/api/v1/sessions",
            post(session_handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(session_handlers::handle_get_session)
                .delete(session_handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/load-more",
            post(session_handlers::handle_load_more),
        )
        .route(
            "/api/v1/sessions/:id/likes",
            post(session_handlers::handle_toggle_like),
        )
        .with_state(state)
}

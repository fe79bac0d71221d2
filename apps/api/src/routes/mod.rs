pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::dataset::handlers as dataset;
use crate::state::AppState;
use crate::strategy::handlers as strategy;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // One-shot API
        .route("/api/v1/datasets/analyze", post(dataset::handle_analyze))
        .route("/api/v1/strategy", post(strategy::handle_generate_strategy))
        // Wizard API
        .route("/api/v1/sessions", post(wizard::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(wizard::handle_get_session).delete(wizard::handle_reset_session),
        )
        .route("/api/v1/sessions/:id/start", post(wizard::handle_start))
        .route(
            "/api/v1/sessions/:id/answers",
            patch(wizard::handle_update_answers),
        )
        .route("/api/v1/sessions/:id/upload", post(wizard::handle_upload))
        .route("/api/v1/sessions/:id/next", post(wizard::handle_next))
        .route("/api/v1/sessions/:id/back", post(wizard::handle_back))
        .route(
            "/api/v1/sessions/:id/skip-upload",
            post(wizard::handle_skip_upload),
        )
        .route("/api/v1/sessions/:id/generate", post(wizard::handle_generate))
        .layer(body_limit)
        .with_state(state)
}

pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::store::handlers as store_handlers;
use crate::tailor::handlers as tailor_handlers;
use crate::translate::handlers as translate_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume document
        .route(
            "/api/v1/resume",
            put(store_handlers::handle_load_resume).get(store_handlers::handle_get_resume),
        )
        // LLM-backed operations
        .route(
            "/api/v1/resume/tailor",
            post(tailor_handlers::handle_tailor),
        )
        .route(
            "/api/v1/resume/translate",
            post(translate_handlers::handle_translate),
        )
        .with_state(state)
}

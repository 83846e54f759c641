pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ideas::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/ideas/generate", post(handlers::handle_generate))
        .route("/api/v1/ideas/reconcile", post(handlers::handle_reconcile))
        .route("/api/v1/ideas", get(handlers::handle_list_ideas))
        .route("/api/v1/ideas/pending", get(handlers::handle_pending))
        .route(
            "/api/v1/ideas/detail/:video_id/:comment_id",
            get(handlers::handle_idea_detail),
        )
        .with_state(state)
}

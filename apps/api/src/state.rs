use std::sync::Arc;

use sqlx::PgPool;

use crate::engine_client::IdeaEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable idea-engine backend. Production: `HttpIdeaEngine`.
    pub engine: Arc<dyn IdeaEngine>,
}

mod auth;
mod config;
mod db;
mod engine_client;
mod errors;
mod ideas;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::engine_client::HttpIdeaEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting IdeaForge API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (pool + migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize the idea-engine client
    let engine = Arc::new(HttpIdeaEngine::new(
        config.engine_url.clone(),
        config.engine_token.clone(),
    ));
    info!("Idea engine client initialized ({})", config.engine_url);

    // Build app state
    let state = AppState { db, engine };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

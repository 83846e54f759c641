//! Axum route handlers for the Ideas API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::ideas::coordinator::{self, IdeaDetail, KickoffOutcome, ReconcileOutcome};
use crate::models::idea::IdeaRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct IdeaListResponse {
    pub ideas: Vec<IdeaRow>,
}

#[derive(Debug, Serialize)]
pub struct PendingResponse {
    pub has_pending: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ideas/generate
///
/// Consumes the user's unused comments and submits one generation job.
pub async fn handle_generate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<KickoffOutcome>, AppError> {
    let outcome = coordinator::kickoff(&state.db, state.engine.as_ref(), user_id).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/ideas/reconcile
///
/// Polls every in-flight job once. Per-job failures are logged and counted,
/// never surfaced as an error; the next poll retries still-active jobs.
pub async fn handle_reconcile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ReconcileOutcome>, AppError> {
    let outcome = coordinator::reconcile(&state.db, state.engine.as_ref(), user_id).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/ideas
///
/// All generated ideas for the user, newest first.
pub async fn handle_list_ideas(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<IdeaListResponse>, AppError> {
    let ideas = coordinator::list_ideas(&state.db, user_id).await?;
    Ok(Json(IdeaListResponse { ideas }))
}

/// GET /api/v1/ideas/pending
///
/// Whether any job is still awaiting reconciliation; the surface uses this
/// to decide when to keep polling.
pub async fn handle_pending(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PendingResponse>, AppError> {
    let has_pending = coordinator::has_pending(&state.db, user_id).await?;
    Ok(Json(PendingResponse { has_pending }))
}

/// GET /api/v1/ideas/detail/:video_id/:comment_id
///
/// Display strings for one idea's source; dangling references resolve to
/// sentinels instead of a 404.
pub async fn handle_idea_detail(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((video_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<IdeaDetail>, AppError> {
    let detail = coordinator::idea_detail(&state.db, user_id, video_id, comment_id).await?;
    Ok(Json(detail))
}

//! Idea-generation lifecycle — orchestrates kickoff, polling, and result
//! reconciliation.
//!
//! Flow: select unused comments → mark consumed → engine kickoff → record
//! job. Later, invoker-driven: poll unprocessed jobs → record observed state
//! → on SUCCESS parse the result → latch processed + insert ideas.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::engine_client::IdeaEngine;
use crate::errors::AppError;
use crate::ideas::payload::{encode_batch, parse_result};
use crate::ideas::store;
use crate::models::idea::IdeaRow;
use crate::models::job::{self, IdeaJobRow};

pub const VIDEO_NOT_FOUND: &str = "Video not found";
pub const COMMENT_NOT_FOUND: &str = "Comment not found";

// ────────────────────────────────────────────────────────────────────────────
// Outcome types
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of a kickoff: the job handle plus how many comments it consumed.
#[derive(Debug, Clone, Serialize)]
pub struct KickoffOutcome {
    pub job_id: Uuid,
    pub kickoff_id: String,
    pub comments_submitted: usize,
}

/// Outcome of one reconcile pass over a user's in-flight jobs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileOutcome {
    pub jobs_polled: usize,
    pub jobs_completed: usize,
    pub jobs_failed: usize,
    pub ideas_inserted: usize,
}

/// Display strings for one idea's source video and comment.
#[derive(Debug, Clone, Serialize)]
pub struct IdeaDetail {
    pub video_title: String,
    pub comment_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Lifecycle operations
// ────────────────────────────────────────────────────────────────────────────

/// Consumes up to the batch limit of unused comments and submits them to the
/// engine as one generation job.
///
/// Comments are marked used BEFORE the remote call and are never reset: a
/// submission failure after the consumption commit loses the batch. Accepted
/// trade — no batch is ever submitted twice.
pub async fn kickoff(
    pool: &PgPool,
    engine: &dyn IdeaEngine,
    user_id: Uuid,
) -> Result<KickoffOutcome, AppError> {
    let mut tx = pool.begin().await?;

    let batch = store::select_unused_comments(&mut tx, user_id).await?;
    if batch.is_empty() {
        // Transaction dropped unchanged: nothing consumed, nothing submitted.
        return Err(AppError::NoUnusedComments);
    }

    let comment_ids: Vec<Uuid> = batch.iter().map(|c| c.comment_id).collect();
    store::mark_comments_used(&mut tx, user_id, &comment_ids).await?;
    tx.commit().await?;

    info!("Consumed {} comments for user {user_id}", batch.len());

    let comments_json = encode_batch(&batch)?;

    let kickoff = engine
        .kickoff(&comments_json)
        .await
        .map_err(|e| AppError::EngineSubmission(e.to_string()))?;

    let job_id = store::insert_job(pool, user_id, &kickoff.kickoff_id, job::STARTED).await?;

    info!(
        "Recorded job {job_id} (kickoff {}) for user {user_id}",
        kickoff.kickoff_id
    );

    Ok(KickoffOutcome {
        job_id,
        kickoff_id: kickoff.kickoff_id,
        comments_submitted: batch.len(),
    })
}

/// Polls every unprocessed, still-active job for the user and folds SUCCESS
/// results into storage.
///
/// One job's failure never aborts its siblings: the error is logged, the
/// counter bumped, and the job retried on the next poll for as long as its
/// stored state stays active.
pub async fn reconcile(
    pool: &PgPool,
    engine: &dyn IdeaEngine,
    user_id: Uuid,
) -> Result<ReconcileOutcome, AppError> {
    let jobs = store::unprocessed_active_jobs(pool, user_id).await?;
    if jobs.is_empty() {
        return Ok(ReconcileOutcome::default());
    }

    let mut outcome = ReconcileOutcome::default();

    for job_row in jobs {
        outcome.jobs_polled += 1;

        match reconcile_one(pool, engine, user_id, &job_row).await {
            Ok(Some(inserted)) => {
                outcome.jobs_completed += 1;
                outcome.ideas_inserted += inserted;
            }
            Ok(None) => {}
            Err(e) => {
                outcome.jobs_failed += 1;
                error!(
                    "Failed to reconcile job {} (kickoff {}): {e}",
                    job_row.id, job_row.kickoff_id
                );
            }
        }
    }

    Ok(outcome)
}

/// Polls one job and applies its observed state. Returns the number of ideas
/// inserted when the job reached SUCCESS, None while it is still running.
async fn reconcile_one(
    pool: &PgPool,
    engine: &dyn IdeaEngine,
    user_id: Uuid,
    job_row: &IdeaJobRow,
) -> Result<Option<usize>, AppError> {
    let status = engine
        .status(&job_row.kickoff_id)
        .await
        .map_err(|e| AppError::EngineStatus(e.to_string()))?;

    // The observed state is recorded even when the rest of this pass fails;
    // a terminal state takes the job out of the polling set for good.
    store::update_job_state(pool, job_row.id, &status.state).await?;

    if status.state != job::SUCCESS {
        if !job::is_active(&status.state) {
            info!(
                "Job {} ended in terminal state {} with no ideas",
                job_row.id, status.state
            );
        }
        return Ok(None);
    }

    let raw = status.result.as_deref().ok_or_else(|| {
        AppError::MalformedResult("SUCCESS status carried no result".to_string())
    })?;
    let parsed = parse_result(raw)?;

    store::complete_job_with_ideas(pool, user_id, job_row.id, &parsed.raw, &parsed.ideas).await?;

    info!(
        "Job {} completed with {} ideas for user {user_id}",
        job_row.id,
        parsed.ideas.len()
    );

    Ok(Some(parsed.ideas.len()))
}

/// True when at least one job for the user is still awaiting reconciliation.
pub async fn has_pending(pool: &PgPool, user_id: Uuid) -> Result<bool, AppError> {
    Ok(store::has_unprocessed_active_jobs(pool, user_id).await?)
}

/// All generated ideas for the user, newest first.
pub async fn list_ideas(pool: &PgPool, user_id: Uuid) -> Result<Vec<IdeaRow>, AppError> {
    Ok(store::ideas_for_user(pool, user_id).await?)
}

/// Resolves the display strings for one idea's video and comment.
/// Never fails on dangling references; each half resolves independently.
pub async fn idea_detail(
    pool: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
    comment_id: Uuid,
) -> Result<IdeaDetail, AppError> {
    let video_title = store::find_video_title(pool, user_id, video_id).await?;
    let comment_text = store::find_comment_text(pool, user_id, comment_id).await?;

    Ok(resolve_detail(video_title, comment_text))
}

/// Substitutes the sentinel for whichever half is missing.
fn resolve_detail(video_title: Option<String>, comment_text: Option<String>) -> IdeaDetail {
    IdeaDetail {
        video_title: video_title.unwrap_or_else(|| VIDEO_NOT_FOUND.to_string()),
        comment_text: comment_text.unwrap_or_else(|| COMMENT_NOT_FOUND.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_detail_both_present() {
        let detail = resolve_detail(
            Some("Knife skills 101".to_string()),
            Some("What about left-handed grips?".to_string()),
        );
        assert_eq!(detail.video_title, "Knife skills 101");
        assert_eq!(detail.comment_text, "What about left-handed grips?");
    }

    #[test]
    fn test_resolve_detail_halves_are_independent() {
        let detail = resolve_detail(None, Some("still here".to_string()));
        assert_eq!(detail.video_title, VIDEO_NOT_FOUND);
        assert_eq!(detail.comment_text, "still here");

        let detail = resolve_detail(Some("still here".to_string()), None);
        assert_eq!(detail.video_title, "still here");
        assert_eq!(detail.comment_text, COMMENT_NOT_FOUND);
    }

    #[test]
    fn test_reconcile_outcome_starts_at_zero() {
        let outcome = ReconcileOutcome::default();
        assert_eq!(outcome.jobs_polled, 0);
        assert_eq!(outcome.jobs_completed, 0);
        assert_eq!(outcome.jobs_failed, 0);
        assert_eq!(outcome.ideas_inserted, 0);
    }
}

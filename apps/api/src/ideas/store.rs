//! Typed persistence operations for the idea-generation lifecycle.
//!
//! Every operation filters by the owning user; rows are never visible across
//! users. The atomicity boundaries the coordinator relies on live here:
//! comment consumption and SUCCESS-job completion each run in one
//! transaction.

use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::ideas::payload::{BatchComment, EngineIdea};
use crate::models::idea::IdeaRow;
use crate::models::job::{IdeaJobRow, ACTIVE_STATES};

/// Max comments consumed per kickoff.
pub const KICKOFF_BATCH_LIMIT: i64 = 50;

fn active_state_strings() -> Vec<String> {
    ACTIVE_STATES.iter().map(|s| s.to_string()).collect()
}

/// Selects up to the batch limit of unused comments for the user, oldest
/// first, joined with their video titles. Locks the selected comment rows so
/// a concurrent kickoff cannot consume the same batch.
pub async fn select_unused_comments(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Vec<BatchComment>, sqlx::Error> {
    sqlx::query_as::<_, BatchComment>(
        r#"
        SELECT v.title, vc.comment_text AS comment, v.id AS video_id, vc.id AS comment_id
        FROM video_comments vc
        INNER JOIN videos v ON v.id = vc.video_id
        WHERE vc.user_id = $1 AND vc.is_used = FALSE
        ORDER BY vc.created_at ASC
        LIMIT $2
        FOR UPDATE OF vc SKIP LOCKED
        "#,
    )
    .bind(user_id)
    .bind(KICKOFF_BATCH_LIMIT)
    .fetch_all(&mut **tx)
    .await
}

/// Flips `is_used` on exactly the given comments. One-way: nothing resets it.
pub async fn mark_comments_used(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    comment_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE video_comments
        SET is_used = TRUE, updated_at = NOW()
        WHERE user_id = $1 AND id = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(comment_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Records a freshly submitted job and returns its id.
pub async fn insert_job(
    pool: &PgPool,
    user_id: Uuid,
    kickoff_id: &str,
    job_state: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO idea_jobs (id, user_id, kickoff_id, job_state)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(kickoff_id)
    .bind(job_state)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Jobs still worth polling: unprocessed and in an engine-active state.
pub async fn unprocessed_active_jobs(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<IdeaJobRow>, sqlx::Error> {
    sqlx::query_as::<_, IdeaJobRow>(
        r#"
        SELECT * FROM idea_jobs
        WHERE user_id = $1 AND processed = FALSE AND job_state = ANY($2::text[])
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(active_state_strings())
    .fetch_all(pool)
    .await
}

/// Records the engine's observed state for a job, terminal or not.
pub async fn update_job_state(
    pool: &PgPool,
    job_id: Uuid,
    job_state: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE idea_jobs SET job_state = $2, updated_at = NOW() WHERE id = $1")
        .bind(job_id)
        .bind(job_state)
        .execute(pool)
        .await?;

    Ok(())
}

/// Latches a SUCCESS job as processed and inserts its derived ideas in one
/// transaction, so `processed = true` always implies the ideas exist.
pub async fn complete_job_with_ideas(
    pool: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
    raw_result: &Value,
    ideas: &[EngineIdea],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE idea_jobs
        SET job_result = $2, processed = TRUE, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(job_id)
    .bind(raw_result)
    .execute(&mut *tx)
    .await?;

    for idea in ideas {
        sqlx::query(
            r#"
            INSERT INTO ideas
                (id, user_id, video_id, comment_id, score, video_title, description, research)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(idea.video_id)
        .bind(idea.comment_id)
        .bind(idea.score_or_default())
        .bind(&idea.video_title)
        .bind(&idea.description)
        .bind(idea.research_urls())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// True iff at least one job for the user is unprocessed and still active.
pub async fn has_unprocessed_active_jobs(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM idea_jobs
            WHERE user_id = $1 AND processed = FALSE AND job_state = ANY($2::text[])
        )
        "#,
    )
    .bind(user_id)
    .bind(active_state_strings())
    .fetch_one(pool)
    .await
}

/// All ideas for the user, newest first.
pub async fn ideas_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<IdeaRow>, sqlx::Error> {
    sqlx::query_as::<_, IdeaRow>(
        "SELECT * FROM ideas WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_video_title(
    pool: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT title FROM videos WHERE id = $1 AND user_id = $2")
        .bind(video_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_comment_text(
    pool: &PgPool,
    user_id: Uuid,
    comment_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT comment_text FROM video_comments WHERE id = $1 AND user_id = $2")
        .bind(comment_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

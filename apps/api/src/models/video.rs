#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked video. Read-only from the coordinator's perspective; rows are
/// created by the comment-ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// One ingested comment. `is_used` flips exactly once, when a kickoff
/// consumes the comment into a generation batch.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VideoCommentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub comment_text: String,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One generated content suggestion, linked to the video and comment it was
/// derived from. Created only when a SUCCESS job is reconciled; immutable
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IdeaRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub comment_id: Uuid,
    pub score: i32,
    pub video_title: String,
    pub description: String,
    /// Supporting research URLs. Unordered.
    pub research: Vec<String>,
    pub created_at: DateTime<Utc>,
}

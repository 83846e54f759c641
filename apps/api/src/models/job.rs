#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

pub const PENDING: &str = "PENDING";
pub const STARTED: &str = "STARTED";
pub const RUNNING: &str = "RUNNING";
pub const SUCCESS: &str = "SUCCESS";
pub const FAILURE: &str = "FAILURE";

/// States the engine reports while a run is still in flight. Anything else
/// (SUCCESS, FAILURE, or a provider-specific value we store opaquely) is
/// terminal for polling purposes.
pub const ACTIVE_STATES: [&str; 3] = [PENDING, STARTED, RUNNING];

/// True while the engine is still working on the job.
pub fn is_active(state: &str) -> bool {
    ACTIVE_STATES.contains(&state)
}

/// One remote generation run.
///
/// `job_state` holds the provider's value verbatim and only moves forward in
/// the provider's lifecycle. `processed` is a one-way latch: it is set, in
/// the same transaction that inserts the derived ideas, only when a SUCCESS
/// result has been folded into storage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IdeaJobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kickoff_id: String,
    pub job_state: String,
    pub processed: bool,
    pub job_result: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_states_are_active() {
        assert!(is_active(PENDING));
        assert!(is_active(STARTED));
        assert!(is_active(RUNNING));
    }

    #[test]
    fn test_terminal_states_are_not_active() {
        assert!(!is_active(SUCCESS));
        assert!(!is_active(FAILURE));
    }

    #[test]
    fn test_unknown_provider_state_is_terminal() {
        // Provider-defined values outside the known set drop out of polling.
        assert!(!is_active("CANCELLED"));
        assert!(!is_active(""));
    }
}

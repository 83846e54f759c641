//! Serialization boundary between the coordinator and the engine.
//!
//! The engine's wire format nests JSON-as-string twice: the kickoff payload
//! carries the comment batch as one JSON string, and the status result comes
//! back as a JSON string of idea entries. Both directions live here so schema
//! violations surface as `MalformedResult` instead of leaking raw parse
//! errors to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// One comment in a kickoff batch, joined with its video title.
///
/// Doubles as the selection row shape and the wire entry shape; the field
/// names here ARE the engine's expected keys.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BatchComment {
    pub title: String,
    pub comment: String,
    pub video_id: Uuid,
    pub comment_id: Uuid,
}

/// A supporting research link in an engine result entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchLink {
    pub url: String,
}

/// One generated idea as the engine reports it.
///
/// `score` and `research` are optional on the wire; the accessors apply the
/// defaults so storage always sees concrete values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineIdea {
    pub video_id: Uuid,
    pub comment_id: Uuid,
    pub description: String,
    pub video_title: String,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub research: Option<Vec<ResearchLink>>,
}

impl EngineIdea {
    /// Score with the absent-value default applied.
    pub fn score_or_default(&self) -> i32 {
        self.score.unwrap_or(0)
    }

    /// Research URLs with the absent-value default applied.
    pub fn research_urls(&self) -> Vec<String> {
        self.research
            .as_ref()
            .map(|links| links.iter().map(|r| r.url.clone()).collect())
            .unwrap_or_default()
    }
}

/// A SUCCESS result payload, parsed once: the raw value kept for storage and
/// the typed entries the ideas are derived from.
#[derive(Debug, Clone)]
pub struct ParsedResult {
    pub raw: Value,
    pub ideas: Vec<EngineIdea>,
}

/// Serializes the selected batch into the JSON string the kickoff payload
/// embeds under `inputs.comments`.
pub fn encode_batch(batch: &[BatchComment]) -> Result<String, AppError> {
    serde_json::to_string(batch)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize comment batch: {e}")))
}

/// Parses a SUCCESS result payload (a JSON string of idea entries).
pub fn parse_result(raw: &str) -> Result<ParsedResult, AppError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::MalformedResult(format!("result is not valid JSON: {e}")))?;

    let ideas: Vec<EngineIdea> = serde_json::from_value(value.clone())
        .map_err(|e| AppError::MalformedResult(format!("unexpected idea shape: {e}")))?;

    Ok(ParsedResult { raw: value, ideas })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch() -> Vec<BatchComment> {
        vec![
            BatchComment {
                title: "Sourdough starters explained".to_string(),
                comment: "Please do a video on rye flour!".to_string(),
                video_id: Uuid::new_v4(),
                comment_id: Uuid::new_v4(),
            },
            BatchComment {
                title: "Knife skills 101".to_string(),
                comment: "What about left-handed grips?".to_string(),
                video_id: Uuid::new_v4(),
                comment_id: Uuid::new_v4(),
            },
        ]
    }

    #[test]
    fn test_encode_batch_produces_wire_keys() {
        let batch = sample_batch();
        let encoded = encode_batch(&batch).unwrap();

        let value: Value = serde_json::from_str(&encoded).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0]["title"].as_str().unwrap(),
            "Sourdough starters explained"
        );
        assert!(entries[0]["comment"].is_string());
        assert!(entries[0]["video_id"].is_string());
        assert!(entries[0]["comment_id"].is_string());
    }

    #[test]
    fn test_parse_result_full_entry() {
        let video_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let raw = serde_json::json!([{
            "video_id": video_id,
            "comment_id": comment_id,
            "description": "Deep-dive on rye starters",
            "video_title": "Sourdough starters explained",
            "score": 87,
            "research": [{"url": "https://example.com/rye"}]
        }])
        .to_string();

        let parsed = parse_result(&raw).unwrap();
        assert_eq!(parsed.ideas.len(), 1);

        let idea = &parsed.ideas[0];
        assert_eq!(idea.video_id, video_id);
        assert_eq!(idea.comment_id, comment_id);
        assert_eq!(idea.score_or_default(), 87);
        assert_eq!(idea.research_urls(), vec!["https://example.com/rye"]);
    }

    #[test]
    fn test_parse_result_defaults_score_and_research() {
        let raw = serde_json::json!([{
            "video_id": Uuid::new_v4(),
            "comment_id": Uuid::new_v4(),
            "description": "Left-handed knife skills follow-up",
            "video_title": "Knife skills 101"
        }])
        .to_string();

        let parsed = parse_result(&raw).unwrap();
        let idea = &parsed.ideas[0];
        assert_eq!(idea.score_or_default(), 0);
        assert!(idea.research_urls().is_empty());
    }

    #[test]
    fn test_parse_result_keeps_raw_value() {
        let raw = r#"[]"#;
        let parsed = parse_result(raw).unwrap();
        assert!(parsed.ideas.is_empty());
        assert_eq!(parsed.raw, serde_json::json!([]));
    }

    #[test]
    fn test_parse_result_rejects_non_json() {
        let result = parse_result("definitely not json");
        assert!(matches!(result, Err(AppError::MalformedResult(_))));
    }

    #[test]
    fn test_parse_result_rejects_wrong_shape() {
        // Valid JSON, but not a list of idea entries.
        let result = parse_result(r#"{"state": "SUCCESS"}"#);
        assert!(matches!(result, Err(AppError::MalformedResult(_))));

        // Entry missing required fields.
        let result = parse_result(r#"[{"description": "no ids"}]"#);
        assert!(matches!(result, Err(AppError::MalformedResult(_))));
    }

    #[test]
    fn test_parse_result_rejects_invalid_uuid() {
        let raw = serde_json::json!([{
            "video_id": "not-a-uuid",
            "comment_id": Uuid::new_v4(),
            "description": "dangling",
            "video_title": "t"
        }])
        .to_string();

        assert!(matches!(
            parse_result(&raw),
            Err(AppError::MalformedResult(_))
        ));
    }
}

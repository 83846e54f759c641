//! Engine Client — the single point of entry for all remote idea-engine calls.
//!
//! ARCHITECTURAL RULE: no other module may speak to the orchestration service
//! directly. All engine interactions go through the `IdeaEngine` trait held
//! in `AppState`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Engine runs execute asynchronously server-side, so both endpoints answer
/// quickly; the bound protects against a hung proxy.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Body of `POST /kickoff`. The engine expects the comment batch as a JSON
/// string nested under `inputs.comments`, not as inline JSON.
#[derive(Debug, Serialize)]
struct KickoffRequest<'a> {
    inputs: KickoffInputs<'a>,
}

#[derive(Debug, Serialize)]
struct KickoffInputs<'a> {
    comments: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct KickoffResponse {
    pub kickoff_id: String,
}

/// Reply of `GET /status/{kickoff_id}`. `result` is only present once the
/// run finishes, and is itself a JSON string (see `ideas::payload`).
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub state: String,
    pub result: Option<String>,
}

/// The idea-engine trait. Implement this to swap backends without touching
/// the coordinator, handlers, or routes.
///
/// Carried in `AppState` as `Arc<dyn IdeaEngine>`.
#[async_trait]
pub trait IdeaEngine: Send + Sync {
    /// Submits a comment batch and returns the remote job identifier.
    async fn kickoff(&self, comments_json: &str) -> Result<KickoffResponse, EngineError>;

    /// Polls the current state of a previously submitted job.
    async fn status(&self, kickoff_id: &str) -> Result<StatusResponse, EngineError>;
}

/// Production backend speaking the orchestration service's HTTP API with
/// bearer-token auth.
///
/// No automatic retry: a blind kickoff retry could submit an already-consumed
/// batch twice. Callers decide what a failure means.
pub struct HttpIdeaEngine {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl HttpIdeaEngine {
    pub fn new(base_url: String, bearer_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    fn kickoff_url(&self) -> String {
        format!("{}/kickoff", self.base_url)
    }

    fn status_url(&self, kickoff_id: &str) -> String {
        format!("{}/status/{}", self.base_url, kickoff_id)
    }

    /// Drains a non-2xx response into an API error carrying status and body.
    async fn api_error(response: reqwest::Response) -> EngineError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        EngineError::Api { status, message }
    }
}

#[async_trait]
impl IdeaEngine for HttpIdeaEngine {
    async fn kickoff(&self, comments_json: &str) -> Result<KickoffResponse, EngineError> {
        let response = self
            .client
            .post(self.kickoff_url())
            .bearer_auth(&self.bearer_token)
            .json(&KickoffRequest {
                inputs: KickoffInputs {
                    comments: comments_json,
                },
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let kickoff: KickoffResponse = response.json().await?;
        debug!("Engine accepted kickoff {}", kickoff.kickoff_id);
        Ok(kickoff)
    }

    async fn status(&self, kickoff_id: &str) -> Result<StatusResponse, EngineError> {
        let response = self
            .client
            .get(self.status_url(kickoff_id))
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building_strips_trailing_slash() {
        let engine = HttpIdeaEngine::new("http://engine.local/".to_string(), "tok".to_string());
        assert_eq!(engine.kickoff_url(), "http://engine.local/kickoff");
        assert_eq!(engine.status_url("abc-123"), "http://engine.local/status/abc-123");
    }

    #[test]
    fn test_kickoff_request_nests_comments_as_string() {
        let request = KickoffRequest {
            inputs: KickoffInputs {
                comments: r#"[{"comment":"great video"}]"#,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        // The batch must cross the wire as one JSON string, not inline JSON.
        assert!(value["inputs"]["comments"].is_string());
        assert_eq!(
            value["inputs"]["comments"].as_str().unwrap(),
            r#"[{"comment":"great video"}]"#
        );
    }

    #[test]
    fn test_status_response_result_is_optional() {
        let running: StatusResponse =
            serde_json::from_str(r#"{"state": "RUNNING"}"#).unwrap();
        assert_eq!(running.state, "RUNNING");
        assert!(running.result.is_none());

        let done: StatusResponse =
            serde_json::from_str(r#"{"state": "SUCCESS", "result": "[]"}"#).unwrap();
        assert_eq!(done.state, "SUCCESS");
        assert_eq!(done.result.as_deref(), Some("[]"));
    }
}

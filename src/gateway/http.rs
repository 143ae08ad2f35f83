//! HTTP client for the analysis backend.
//!
//! Uses the synchronous `ureq` client. Request bodies follow the backend's
//! snake_case contract:
//!
//! - `POST /api/generate`: `{ repo_url, provider }` → `{ prompt }`
//! - `POST /api/feedback`: `{ repo_url, rating, comments, improvements }`
//! - `GET  /api/stats`: aggregate stats document
//! - `GET  /health`: liveness
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::{Backend, GeneratedPrompt};
use crate::config::schema::BackendConfig;
use crate::error::AppError;
use crate::model::FeedbackSubmission;

/// Shown whenever the backend cannot be reached or the exchange breaks down.
pub const TRANSPORT_MESSAGE: &str = "Could not reach the analysis backend. Please try again.";

const GENERATE_FALLBACK: &str = "Failed to generate prompt from backend";
const FEEDBACK_FALLBACK: &str = "Failed to submit feedback to backend";
const STATS_FALLBACK: &str = "Failed to fetch stats from backend";
const INVALID_RESPONSE: &str = "Backend returned an invalid response";

/// Timeout for the liveness probe, independent of the request timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    repo_url: &'a str,
    provider: &'a str,
}

#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    repo_url: &'a str,
    rating: u8,
    comments: &'a str,
    improvements: &'a str,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous backend client. Cheap to share: the inner agent is
/// reference-counted and safe to use from many threads.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    provider: String,
    agent: ureq::Agent,
}

impl HttpBackend {
    /// Client for server-to-backend calls (`backend.url`).
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(
            &config.url,
            &config.provider,
            Duration::from_millis(config.timeout_ms),
        )
    }

    /// Client for browser-direct stats calls (`backend.public_url`).
    pub fn public_from_config(config: &BackendConfig) -> Self {
        Self::new(
            &config.public_url,
            &config.provider,
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn new(base_url: &str, provider: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            provider: provider.to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the backend answers its `/health` route.
    pub fn is_healthy(&self) -> bool {
        self.agent
            .get(&self.url("/health"))
            .timeout(HEALTH_TIMEOUT)
            .call()
            .is_ok()
    }

    fn url(&self, path: &str) -> String {
        // On Windows, "localhost" may try IPv6 (::1) first, causing delays
        // when the backend only binds to IPv4.
        format!("{}{path}", self.base_url).replace("://localhost", "://127.0.0.1")
    }
}

impl Backend for HttpBackend {
    fn generate(&self, repository_url: &str) -> Result<GeneratedPrompt, AppError> {
        let body = GenerateRequest {
            repo_url: repository_url,
            provider: &self.provider,
        };
        let resp = normalize(
            self.agent.post(&self.url("/api/generate")).send_json(&body),
            GENERATE_FALLBACK,
        )?;

        let doc = read_json(resp)?;
        match doc.get("prompt").and_then(Value::as_str) {
            Some(prompt) => Ok(GeneratedPrompt {
                prompt_text: prompt.to_string(),
            }),
            None => Err(AppError::Backend(INVALID_RESPONSE.to_string())),
        }
    }

    fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<(), AppError> {
        let body = FeedbackRequest {
            repo_url: &submission.repository_url,
            rating: submission.rating,
            comments: &submission.comments,
            improvements: &submission.improvements,
        };
        normalize(
            self.agent.post(&self.url("/api/feedback")).send_json(&body),
            FEEDBACK_FALLBACK,
        )?;
        Ok(())
    }

    fn stats_document(&self) -> Result<Value, AppError> {
        let resp = normalize(self.agent.get(&self.url("/api/stats")).call(), STATS_FALLBACK)?;
        read_json(resp)
    }
}

// ---------------------------------------------------------------------------
// Response normalization
// ---------------------------------------------------------------------------

/// Collapse a `ureq` outcome into the uniform error shape.
///
/// Non-2xx responses carry the body's `error` field when present, else
/// `fallback`. Transport failures never leak their details.
pub(crate) fn normalize(
    result: Result<ureq::Response, ureq::Error>,
    fallback: &str,
) -> Result<ureq::Response, AppError> {
    match result {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(_, resp)) => Err(AppError::Backend(
            error_field(resp).unwrap_or_else(|| fallback.to_string()),
        )),
        Err(ureq::Error::Transport(_)) => Err(AppError::Transport(TRANSPORT_MESSAGE.to_string())),
    }
}

/// Read a successful response body as JSON.
pub(crate) fn read_json(resp: ureq::Response) -> Result<Value, AppError> {
    let text = resp
        .into_string()
        .map_err(|_| AppError::Transport(TRANSPORT_MESSAGE.to_string()))?;
    serde_json::from_str(&text).map_err(|_| AppError::Backend(INVALID_RESPONSE.to_string()))
}

/// The non-empty `error` string of a JSON error body, if any.
pub(crate) fn error_field(resp: ureq::Response) -> Option<String> {
    let text = resp.into_string().ok()?;
    let doc: Value = serde_json::from_str(&text).ok()?;
    doc.get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let client = HttpBackend::from_config(&BackendConfig::default());
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.provider, "groq");
    }

    #[test]
    fn public_client_uses_public_url() {
        let client = HttpBackend::public_from_config(&BackendConfig::default());
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = HttpBackend::new("http://backend:8000/", "groq", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://backend:8000");
        assert_eq!(client.url("/api/stats"), "http://backend:8000/api/stats");
    }

    #[test]
    fn localhost_is_pinned_to_ipv4() {
        let client = HttpBackend::new("http://localhost:8000", "groq", Duration::from_secs(1));
        assert_eq!(client.url("/health"), "http://127.0.0.1:8000/health");
    }

    #[test]
    fn feedback_body_uses_backend_field_names() {
        let body = FeedbackRequest {
            repo_url: "https://github.com/a/b",
            rating: 4,
            comments: "",
            improvements: "shorter",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "repo_url": "https://github.com/a/b",
                "rating": 4,
                "comments": "",
                "improvements": "shorter"
            })
        );
    }
}

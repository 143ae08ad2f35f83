//! Proxy endpoint handlers.
//!
//! Each handler validates its input, delegates to the [`Backend`] and maps
//! the outcome to an [`ApiReply`]. Handlers are stateless and never touch
//! `tiny_http` directly, which keeps them testable with a fake backend.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::gateway::Backend;
use crate::model::{AnalysisRequest, FeedbackSubmission, INVALID_FEEDBACK_MESSAGE, INVALID_URL_MESSAGE};

/// Message returned by a successful feedback submission.
pub const FEEDBACK_ACCEPTED: &str = "Feedback submitted successfully";

/// Status and JSON body of a handled request.
///
/// `error` keeps the failure that produced an error body so the server can
/// log it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
    pub error: Option<AppError>,
}

impl ApiReply {
    fn ok<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(body) => Self {
                status: 200,
                body,
                error: None,
            },
            Err(e) => Self::failure(AppError::Backend(format!("failed to serialize response: {e}"))),
        }
    }

    fn failure(error: AppError) -> Self {
        Self {
            status: error.status(),
            body: json!({ "error": error.message() }),
            error: Some(error),
        }
    }

    fn from_result<T: Serialize>(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(&data),
            Err(e) => Self::failure(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// `POST /generate` request body.
#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(rename = "githubUrl")]
    github_url: Option<String>,
}

/// `POST /generate` success body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub prompt: String,
    pub repo_name: String,
    pub success: bool,
}

/// `POST /submit-feedback` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackBody {
    github_url: Option<String>,
    rating: Option<Value>,
    comments: Option<String>,
    improvements: Option<String>,
}

#[derive(Debug, Serialize)]
struct FeedbackResponse {
    message: &'static str,
    success: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /generate`: validate the URL and ask the backend for a prompt.
pub fn generate_prompt(backend: &dyn Backend, body: &str) -> ApiReply {
    ApiReply::from_result(generate(backend, body))
}

fn generate(backend: &dyn Backend, body: &str) -> Result<GenerateResponse, AppError> {
    let invalid = || AppError::Validation(INVALID_URL_MESSAGE.to_string());

    let parsed: GenerateBody = serde_json::from_str(body).map_err(|_| invalid())?;
    let request = AnalysisRequest::parse(parsed.github_url.as_deref().ok_or_else(invalid)?)?;

    let generated = backend.generate(request.repository_url())?;

    Ok(GenerateResponse {
        prompt: generated.prompt_text,
        repo_name: request.repository_name(),
        success: true,
    })
}

/// `POST /submit-feedback`: validate the rating and forward it.
pub fn submit_feedback(backend: &dyn Backend, body: &str) -> ApiReply {
    ApiReply::from_result(feedback(backend, body))
}

fn feedback(backend: &dyn Backend, body: &str) -> Result<FeedbackResponse, AppError> {
    let parsed: FeedbackBody = serde_json::from_str(body)
        .map_err(|_| AppError::Validation(INVALID_FEEDBACK_MESSAGE.to_string()))?;

    let submission = FeedbackSubmission::new(
        parsed.github_url.as_deref().unwrap_or_default(),
        parsed.rating.as_ref().and_then(Value::as_i64),
        parsed.comments,
        parsed.improvements,
    )?;

    backend.submit_feedback(&submission)?;

    Ok(FeedbackResponse {
        message: FEEDBACK_ACCEPTED,
        success: true,
    })
}

/// `GET /stats`: the backend's stats document, unmodified.
pub fn stats(backend: &dyn Backend) -> ApiReply {
    ApiReply::from_result(backend.stats_document())
}

/// `GET /health`: liveness of the proxy itself.
pub fn health() -> ApiReply {
    ApiReply::ok(&HealthResponse {
        status: "healthy",
        message: "GitHub MVP Generator proxy is running",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

/// Fallback for unknown routes.
pub fn not_found() -> ApiReply {
    ApiReply {
        status: 404,
        body: json!({ "error": "not found" }),
        error: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reports_iso_timestamp() {
        let reply = health();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["status"], "healthy");
        let ts = reply.body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn failure_body_has_only_the_message() {
        let reply = ApiReply::failure(AppError::Transport("down".into()));
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body, json!({ "error": "down" }));
    }

    #[test]
    fn generate_response_uses_camel_case() {
        let body = serde_json::to_value(GenerateResponse {
            prompt: "p".into(),
            repo_name: "a/b".into(),
            success: true,
        })
        .unwrap();
        assert_eq!(body, json!({ "prompt": "p", "repoName": "a/b", "success": true }));
    }

    #[test]
    fn not_found_is_404() {
        assert_eq!(not_found().status, 404);
    }
}

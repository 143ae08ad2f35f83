//! Client side of the proxy contract.
//!
//! Talks to the proxy's `/generate` and `/submit-feedback` routes with the
//! same JSON shapes the embedded page uses, and normalizes failures the
//! same way the backend gateway does.

use std::time::Duration;

use serde::Serialize;

use crate::error::AppError;
use crate::gateway::http::{error_field, normalize, read_json};
use crate::model::{AnalysisResult, FeedbackSubmission};
use crate::web::api::GenerateResponse;

const GENERATE_FALLBACK: &str = "Failed to generate prompt";
const FEEDBACK_FALLBACK: &str = "Failed to submit feedback";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody<'a> {
    github_url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackBody<'a> {
    github_url: &'a str,
    rating: u8,
    comments: &'a str,
    improvements: &'a str,
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ProxyClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /generate`.
    pub fn generate(&self, url: &str) -> Result<AnalysisResult, AppError> {
        let resp = proxy_outcome(
            self.agent
                .post(&format!("{}/generate", self.base_url))
                .send_json(GenerateBody { github_url: url }),
            GENERATE_FALLBACK,
        )?;

        let parsed: GenerateResponse = serde_json::from_value(read_json(resp)?)
            .map_err(|_| AppError::Backend(GENERATE_FALLBACK.to_string()))?;

        Ok(AnalysisResult {
            prompt_text: parsed.prompt,
            repository_name: parsed.repo_name,
            repository_url: url.trim().to_string(),
        })
    }

    /// `POST /submit-feedback`.
    pub fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<(), AppError> {
        proxy_outcome(
            self.agent
                .post(&format!("{}/submit-feedback", self.base_url))
                .send_json(FeedbackBody {
                    github_url: &submission.repository_url,
                    rating: submission.rating,
                    comments: &submission.comments,
                    improvements: &submission.improvements,
                }),
            FEEDBACK_FALLBACK,
        )?;
        Ok(())
    }
}

/// Like [`normalize`], but a 400 from the proxy is the proxy's input
/// validation and keeps that kind.
fn proxy_outcome(
    result: Result<ureq::Response, ureq::Error>,
    fallback: &str,
) -> Result<ureq::Response, AppError> {
    match result {
        Err(ureq::Error::Status(400, resp)) => Err(AppError::Validation(
            error_field(resp).unwrap_or_else(|| fallback.to_string()),
        )),
        other => normalize(other, fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_use_page_field_names() {
        let json = serde_json::to_value(FeedbackBody {
            github_url: "https://github.com/a/b",
            rating: 5,
            comments: "c",
            improvements: "",
        })
        .unwrap();
        assert_eq!(json["githubUrl"], "https://github.com/a/b");
        assert_eq!(json["rating"], 5);

        let json = serde_json::to_value(GenerateBody { github_url: "x" }).unwrap();
        assert_eq!(json, serde_json::json!({ "githubUrl": "x" }));
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ProxyClient::new("http://127.0.0.1:3000/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://127.0.0.1:3000");
    }
}

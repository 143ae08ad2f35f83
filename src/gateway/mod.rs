//! Backend Gateway: the only integration point with the external analysis
//! service.
//!
//! The backend is opaque: it inspects repositories and synthesizes prompts.
//! This module wraps the three calls the application needs behind the
//! [`Backend`] trait and normalizes every outcome into
//! `Result<_, AppError>`:
//!
//! - non-success responses become [`AppError::Backend`] carrying the
//!   backend's `error` field, or an operation-specific fallback message;
//! - unreachable hosts, timeouts and broken exchanges become
//!   [`AppError::Transport`] with a generic message.
//!
//! Each call is a single attempt. There are no retries and no caching; the
//! caller decides what to surface.
pub mod http;
pub mod stats;

use serde_json::Value;

use crate::error::AppError;
use crate::model::FeedbackSubmission;

pub use http::HttpBackend;
pub use stats::UsageStats;

/// Operations offered by the analysis backend.
///
/// Implemented over HTTP by [`HttpBackend`]; tests substitute in-memory
/// fakes.
pub trait Backend: Send + Sync {
    /// Generate a prompt for an already-validated repository URL.
    fn generate(&self, repository_url: &str) -> Result<GeneratedPrompt, AppError>;

    /// File feedback. `Ok(())` means the backend acknowledged it.
    fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<(), AppError>;

    /// The backend's raw stats document.
    fn stats_document(&self) -> Result<Value, AppError>;

    /// Stats decoded for display.
    fn get_stats(&self) -> Result<UsageStats, AppError> {
        self.stats_document()
            .map(|doc| UsageStats::from_document(&doc))
    }
}

/// Successful generate payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPrompt {
    pub prompt_text: String,
}

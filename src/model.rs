//! Domain types exchanged between the page, the proxy and the backend.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

/// Shown when the generate request carries no usable repository URL.
pub const INVALID_URL_MESSAGE: &str =
    "Please enter a valid GitHub repository URL (e.g., https://github.com/user/repo)";

/// Shown when a feedback request is missing its URL or has a bad rating.
pub const INVALID_FEEDBACK_MESSAGE: &str = "Please provide a valid GitHub URL and rating (1-5)";

/// `https://github.com/<owner>/<repo>` with an optional trailing slash.
///
/// Segments are restricted to ASCII word characters, hyphens and dots.
static GITHUB_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+/?$")
        .expect("GitHub URL regex must compile")
});

// ---------------------------------------------------------------------------
// AnalysisRequest
// ---------------------------------------------------------------------------

/// A validated request to analyze one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    repository_url: String,
}

impl AnalysisRequest {
    /// Trim and validate a raw URL.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let url = raw.trim();
        if !is_github_repo_url(url) {
            return Err(AppError::Validation(INVALID_URL_MESSAGE.to_string()));
        }
        Ok(Self {
            repository_url: url.to_string(),
        })
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    /// `owner/repo` for this request.
    pub fn repository_name(&self) -> String {
        repository_name(&self.repository_url)
    }
}

/// Whether `url` (already trimmed) names a GitHub repository.
pub fn is_github_repo_url(url: &str) -> bool {
    GITHUB_URL_RE.is_match(url)
}

/// Derive `owner/repo` from a repository URL: the last two path segments.
///
/// A trailing slash is ignored.
pub fn repository_name(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let mut segments = trimmed.rsplit('/');
    let repo = segments.next().unwrap_or_default();
    match segments.next() {
        Some(owner) => format!("{owner}/{repo}"),
        None => repo.to_string(),
    }
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// A generated prompt, as held by the page until replaced or reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub prompt_text: String,
    pub repository_name: String,
    /// URL the prompt was generated for; feedback is filed against it.
    pub repository_url: String,
}

// ---------------------------------------------------------------------------
// FeedbackSubmission
// ---------------------------------------------------------------------------

/// A rating plus optional comments for one generated prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    pub repository_url: String,
    pub rating: u8,
    pub comments: String,
    pub improvements: String,
}

impl FeedbackSubmission {
    pub const MIN_RATING: i64 = 1;
    pub const MAX_RATING: i64 = 5;

    /// Build a submission, rejecting a blank URL or a rating outside 1..=5.
    pub fn new(
        repository_url: &str,
        rating: Option<i64>,
        comments: Option<String>,
        improvements: Option<String>,
    ) -> Result<Self, AppError> {
        let invalid = || AppError::Validation(INVALID_FEEDBACK_MESSAGE.to_string());

        if repository_url.trim().is_empty() {
            return Err(invalid());
        }
        let rating = rating
            .filter(|r| (Self::MIN_RATING..=Self::MAX_RATING).contains(r))
            .ok_or_else(invalid)?;

        Ok(Self {
            repository_url: repository_url.to_string(),
            rating: rating as u8,
            comments: comments.unwrap_or_default(),
            improvements: improvements.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_repo_urls() {
        assert!(is_github_repo_url("https://github.com/facebook/react"));
        assert!(is_github_repo_url("https://github.com/vercel/next.js"));
        assert!(is_github_repo_url("https://github.com/rust-lang/rust/"));
        assert!(is_github_repo_url("https://github.com/a_b/c-d.e"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(!is_github_repo_url(""));
        assert!(!is_github_repo_url("http://github.com/facebook/react"));
        assert!(!is_github_repo_url("https://gitlab.com/facebook/react"));
        assert!(!is_github_repo_url("https://github.com/facebook"));
        assert!(!is_github_repo_url("https://github.com/facebook/react/tree/main"));
        assert!(!is_github_repo_url("https://github.com/face book/react"));
        assert!(!is_github_repo_url("https://github.com/facebook/react?tab=readme"));
        assert!(!is_github_repo_url("https://github.com/facébook/react"));
    }

    #[test]
    fn parse_trims_whitespace() {
        let req = AnalysisRequest::parse("  https://github.com/facebook/react \n").unwrap();
        assert_eq!(req.repository_url(), "https://github.com/facebook/react");
        assert_eq!(req.repository_name(), "facebook/react");
    }

    #[test]
    fn parse_rejects_with_validation_error() {
        let err = AnalysisRequest::parse("not a url").unwrap_err();
        assert_eq!(err, AppError::Validation(INVALID_URL_MESSAGE.to_string()));
    }

    #[test]
    fn repository_name_uses_last_two_segments() {
        assert_eq!(repository_name("https://github.com/facebook/react"), "facebook/react");
        assert_eq!(repository_name("https://github.com/facebook/react/"), "facebook/react");
        assert_eq!(repository_name("react"), "react");
    }

    #[test]
    fn feedback_requires_rating_in_range() {
        let url = "https://github.com/facebook/react";
        assert!(FeedbackSubmission::new(url, None, None, None).is_err());
        assert!(FeedbackSubmission::new(url, Some(0), None, None).is_err());
        assert!(FeedbackSubmission::new(url, Some(6), None, None).is_err());
        assert!(FeedbackSubmission::new(url, Some(-3), None, None).is_err());
        for rating in 1..=5 {
            assert!(FeedbackSubmission::new(url, Some(rating), None, None).is_ok());
        }
    }

    #[test]
    fn feedback_requires_url() {
        let err = FeedbackSubmission::new("  ", Some(4), None, None).unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn feedback_text_defaults_to_empty() {
        let sub =
            FeedbackSubmission::new("https://github.com/a/b", Some(3), None, Some("more".into()))
                .unwrap();
        assert_eq!(sub.comments, "");
        assert_eq!(sub.improvements, "more");
        assert_eq!(sub.rating, 3);
    }
}

//! Feedback form controller.
//!
//! Owns the rating / comments / improvements fields of one open feedback
//! panel. The rating is kept string-encoded, the way a radio group reports
//! it, and only parsed at submit time.

use super::Notice;
use crate::model::FeedbackSubmission;

const SELECT_RATING: &str = "Please select a rating";

/// Outcome of [`FeedbackForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Send this submission to the proxy.
    Send(FeedbackSubmission),
    /// Local validation failed; nothing goes over the network.
    Rejected(Notice),
    /// A submission is already in flight.
    Busy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    rating: String,
    comments: String,
    improvements: String,
    submitting: bool,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rating(&mut self, rating: impl Into<String>) {
        self.rating = rating.into();
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.comments = comments.into();
    }

    pub fn set_improvements(&mut self, improvements: impl Into<String>) {
        self.improvements = improvements.into();
    }

    /// The selected rating, or `None` while unset.
    pub fn rating(&self) -> Option<&str> {
        Some(self.rating.as_str()).filter(|r| !r.is_empty())
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn improvements(&self) -> &str {
        &self.improvements
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate locally and, if valid, mark the form as submitting.
    pub fn submit(&mut self, repository_url: &str) -> SubmitOutcome {
        if self.submitting {
            return SubmitOutcome::Busy;
        }

        let Some(rating) = self.rating().and_then(|r| r.trim().parse::<i64>().ok()) else {
            return SubmitOutcome::Rejected(Notice::error(SELECT_RATING));
        };

        match FeedbackSubmission::new(
            repository_url,
            Some(rating),
            Some(self.comments.clone()),
            Some(self.improvements.clone()),
        ) {
            Ok(submission) => {
                self.submitting = true;
                SubmitOutcome::Send(submission)
            }
            Err(e) => SubmitOutcome::Rejected(Notice::error(e.message())),
        }
    }

    /// The proxy accepted the feedback: clear every field.
    pub fn on_success(&mut self) -> Notice {
        *self = Self::default();
        Notice::success("Success", "Thank you for your feedback!")
    }

    /// The proxy rejected the feedback: keep the fields for a retry.
    pub fn on_failure(&mut self, message: &str) -> Notice {
        self.submitting = false;
        Notice::error(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::NoticeLevel;

    const URL: &str = "https://github.com/facebook/react";

    #[test]
    fn unset_rating_is_rejected_locally() {
        let mut form = FeedbackForm::new();
        form.set_comments("nice");
        match form.submit(URL) {
            SubmitOutcome::Rejected(notice) => {
                assert_eq!(notice.level, NoticeLevel::Error);
                assert_eq!(notice.description, SELECT_RATING);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(!form.is_submitting());
        assert_eq!(form.comments(), "nice");
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let mut form = FeedbackForm::new();
        form.set_rating("7");
        assert!(matches!(form.submit(URL), SubmitOutcome::Rejected(_)));
        form.set_rating("three");
        assert!(matches!(form.submit(URL), SubmitOutcome::Rejected(_)));
    }

    #[test]
    fn valid_form_builds_submission() {
        let mut form = FeedbackForm::new();
        form.set_rating("4");
        form.set_improvements("mention tests");

        let SubmitOutcome::Send(sub) = form.submit(URL) else {
            panic!("expected a submission");
        };
        assert_eq!(sub.rating, 4);
        assert_eq!(sub.repository_url, URL);
        assert_eq!(sub.comments, "");
        assert_eq!(sub.improvements, "mention tests");
        assert!(form.is_submitting());
    }

    #[test]
    fn second_submit_while_in_flight_is_busy() {
        let mut form = FeedbackForm::new();
        form.set_rating("5");
        assert!(matches!(form.submit(URL), SubmitOutcome::Send(_)));
        assert_eq!(form.submit(URL), SubmitOutcome::Busy);
    }

    #[test]
    fn success_clears_all_fields() {
        let mut form = FeedbackForm::new();
        form.set_rating("2");
        form.set_comments("too long");
        form.set_improvements("shorter");
        let _ = form.submit(URL);

        let notice = form.on_success();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(form.rating(), None);
        assert_eq!(form.comments(), "");
        assert_eq!(form.improvements(), "");
        assert!(!form.is_submitting());
    }

    #[test]
    fn failure_keeps_fields_for_retry() {
        let mut form = FeedbackForm::new();
        form.set_rating("3");
        form.set_comments("ok");
        let _ = form.submit(URL);

        let notice = form.on_failure("backend down");
        assert_eq!(notice.description, "backend down");
        assert_eq!(form.rating(), Some("3"));
        assert_eq!(form.comments(), "ok");
        assert!(matches!(form.submit(URL), SubmitOutcome::Send(_)));
    }
}

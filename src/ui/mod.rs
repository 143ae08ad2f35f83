//! Page controller: the state machine behind the generator page.
//!
//! All page state lives in one owned [`Page`] value. Transitions are plain
//! methods that mutate it and return the [`Effect`]s the driver must carry
//! out (network calls and notices). The controller itself never performs
//! I/O apart from the clipboard, so every transition is testable in
//! isolation.
//!
//! # States
//!
//! ```text
//!            submit(url)                 on_generate_success
//!   Idle ───────────────▶ Generating ─────────────────────────▶ Success
//!    ▲                        │                                   │  ▲
//!    │ reset                  │ on_generate_failure               │  │ on_feedback_submitted
//!    │                        ▼                                   ▼  │
//!    └──────────────────── Failed                           FeedbackOpen
//! ```
//!
//! A new `submit` is accepted from any state except `Generating` and always
//! closes an open feedback panel first. Generate responses are tagged with a
//! request id; a response that does not match the in-flight request is
//! dropped.
pub mod client;
pub mod clipboard;
pub mod feedback;

use std::time::{Duration, Instant};

use crate::gateway::UsageStats;
use crate::model::{AnalysisResult, FeedbackSubmission};
use clipboard::Clipboard;
use feedback::{FeedbackForm, SubmitOutcome};

/// How long the "copied" indicator stays on after a successful copy.
pub const COPIED_INDICATOR: Duration = Duration::from_secs(2);

const EMPTY_URL: &str = "Please enter a GitHub repository URL";

// ---------------------------------------------------------------------------
// Notices and effects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call the generate proxy; report back with the same `request_id`.
    Generate { request_id: u64, url: String },
    /// Call the submit-feedback proxy.
    SubmitFeedback(FeedbackSubmission),
    /// Refresh the usage stats.
    FetchStats,
    Notify(Notice),
}

/// Observable page state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Idle,
    Generating,
    Success,
    Failed,
    FeedbackOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Generating { request_id: u64 },
    Success,
    Failed,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Page {
    phase: Phase,
    result: Option<AnalysisResult>,
    feedback: Option<FeedbackForm>,
    stats: Option<UsageStats>,
    copied_until: Option<Instant>,
    last_request_id: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            result: None,
            feedback: None,
            stats: None,
            copied_until: None,
            last_request_id: 0,
        }
    }

    /// Initial effects when the page is shown.
    pub fn load(&mut self) -> Vec<Effect> {
        vec![Effect::FetchStats]
    }

    // -- Accessors --

    pub fn status(&self) -> PageStatus {
        match self.phase {
            Phase::Generating { .. } => PageStatus::Generating,
            _ if self.feedback.is_some() => PageStatus::FeedbackOpen,
            Phase::Idle => PageStatus::Idle,
            Phase::Success => PageStatus::Success,
            Phase::Failed => PageStatus::Failed,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating { .. })
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn stats(&self) -> Option<&UsageStats> {
        self.stats.as_ref()
    }

    pub fn feedback(&self) -> Option<&FeedbackForm> {
        self.feedback.as_ref()
    }

    /// The open feedback form, for editing its fields.
    pub fn feedback_mut(&mut self) -> Option<&mut FeedbackForm> {
        self.feedback.as_mut()
    }

    /// Whether the "copied" indicator is showing at `now`.
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    // -- Generation --

    /// Start generating a prompt for `url`.
    pub fn submit(&mut self, url: &str) -> Vec<Effect> {
        if self.is_generating() {
            return Vec::new();
        }

        let url = url.trim();
        if url.is_empty() {
            return vec![Effect::Notify(Notice::error(EMPTY_URL))];
        }

        self.feedback = None;
        self.last_request_id += 1;
        self.phase = Phase::Generating {
            request_id: self.last_request_id,
        };

        vec![Effect::Generate {
            request_id: self.last_request_id,
            url: url.to_string(),
        }]
    }

    pub fn on_generate_success(&mut self, request_id: u64, result: AnalysisResult) -> Vec<Effect> {
        if !self.is_in_flight(request_id) {
            return Vec::new();
        }

        self.phase = Phase::Success;
        self.result = Some(result);
        self.copied_until = None;
        vec![Effect::Notify(Notice::success(
            "Success",
            "MVP prompt generated successfully!",
        ))]
    }

    /// The previous result, if any, stays on the page.
    pub fn on_generate_failure(&mut self, request_id: u64, message: &str) -> Vec<Effect> {
        if !self.is_in_flight(request_id) {
            return Vec::new();
        }

        self.phase = Phase::Failed;
        vec![Effect::Notify(Notice::error(message))]
    }

    fn is_in_flight(&self, request_id: u64) -> bool {
        self.phase == Phase::Generating { request_id }
    }

    /// Forget the result and any in-flight request.
    pub fn reset(&mut self) {
        let last_request_id = self.last_request_id;
        let stats = self.stats.take();
        *self = Self::new();
        self.last_request_id = last_request_id;
        self.stats = stats;
    }

    // -- Clipboard --

    /// Copy the prompt verbatim. No-op without a result.
    pub fn copy_prompt(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> Vec<Effect> {
        let Some(result) = &self.result else {
            return Vec::new();
        };

        match clipboard.set_text(&result.prompt_text) {
            Ok(()) => {
                self.copied_until = Some(now + COPIED_INDICATOR);
                vec![Effect::Notify(Notice::success(
                    "Copied!",
                    "Prompt copied to clipboard",
                ))]
            }
            Err(e) => vec![Effect::Notify(Notice::error(e.message()))],
        }
    }

    // -- Feedback --

    /// Open the feedback panel for the current result.
    ///
    /// Returns `false` when there is no result to rate or a generation is
    /// running. An already open panel is kept as is.
    pub fn request_feedback(&mut self) -> bool {
        if self.result.is_none() || self.is_generating() {
            return false;
        }
        self.feedback.get_or_insert_with(FeedbackForm::new);
        true
    }

    /// Submit the open feedback form.
    pub fn submit_feedback(&mut self) -> Vec<Effect> {
        let (Some(form), Some(result)) = (self.feedback.as_mut(), self.result.as_ref()) else {
            return Vec::new();
        };

        match form.submit(&result.repository_url) {
            SubmitOutcome::Send(submission) => vec![Effect::SubmitFeedback(submission)],
            SubmitOutcome::Rejected(notice) => vec![Effect::Notify(notice)],
            SubmitOutcome::Busy => Vec::new(),
        }
    }

    /// Completion of a [`Effect::SubmitFeedback`].
    pub fn on_feedback_result(&mut self, outcome: Result<(), String>) -> Vec<Effect> {
        match outcome {
            Ok(()) => {
                let mut effects = Vec::new();
                if let Some(form) = self.feedback.as_mut() {
                    effects.push(Effect::Notify(form.on_success()));
                }
                effects.extend(self.on_feedback_submitted());
                effects
            }
            Err(message) => {
                let notice = match self.feedback.as_mut() {
                    Some(form) => form.on_failure(&message),
                    None => Notice::error(message),
                };
                vec![Effect::Notify(notice)]
            }
        }
    }

    /// Feedback was filed: hide the panel and refresh stats once.
    pub fn on_feedback_submitted(&mut self) -> Vec<Effect> {
        self.feedback = None;
        vec![
            Effect::FetchStats,
            Effect::Notify(Notice::success(
                "Thank You!",
                "Your feedback helps us improve.",
            )),
        ]
    }

    // -- Stats --

    /// Completion of a [`Effect::FetchStats`]. `None` keeps what is shown.
    pub fn on_stats(&mut self, stats: Option<UsageStats>) {
        if let Some(stats) = stats {
            self.stats = Some(stats);
        }
    }
}

#![warn(missing_docs)]
//! # rice-vision-ui
//!
//! ## Purpose
//! UI-facing state for the image submission pipeline.
//!
//! ## Responsibilities
//! - [`UploadController`]: file selection, validation, one in-flight
//!   classification request, and the resulting [`PresentationState`].
//! - [`ResultPresenter`]: picks exactly one [`RenderedView`] from its inputs,
//!   recovering a result from the [`HandoffInbox`] when none is supplied.
//! - [`UiEffect`]: toasts and scroll requests for the host to perform.
//!
//! ## Data flow
//! Host event -> controller operation -> state change + queued [`UiEffect`]s ->
//! host drains effects and re-renders through the presenter.
//!
//! ## Ownership and lifetimes
//! The controller is the single owner of the candidate image and state. Async
//! submission works on an owned [`PendingSubmission`], so no controller borrow
//! is held across the network call.
//!
//! ## Error model
//! Validation problems and analysis failures never escape as errors to the
//! host; they become state plus a toast. Operation return values exist for
//! callers that want to branch on the outcome.

mod controller;
mod handoff;
mod presenter;

use std::time::Duration;

pub use controller::{
    AnalysisFailure, CompletedSubmission, FileSource, PendingSubmission, SelectOutcome,
    SubmissionOutcome, SubmitRejection, UploadController,
};
pub use handoff::{Handoff, HandoffInbox};
pub use presenter::{NO_RESULTS_MESSAGE, PresentInputs, RenderedView, ResultCard, ResultPresenter};

/// Delay before scrolling to a freshly populated result, so it can mount.
pub const SCROLL_TO_RESULTS_DELAY: Duration = Duration::from_millis(500);

/// Display mode of the submission pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationState {
    /// No image selected.
    Empty,
    /// Image selected, not submitted.
    Ready,
    /// Submission in flight.
    Loading,
    /// Analysis succeeded.
    Populated(rice_vision_core::DetectionResult),
    /// Last submission failed.
    Error,
}

impl PresentationState {
    /// Short lowercase label for logs and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Ready => "ready",
            Self::Loading => "loading",
            Self::Populated(_) => "populated",
            Self::Error => "error",
        }
    }
}

/// Toast tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Positive confirmation.
    Success,
    /// Something the user must act on.
    Error,
}

/// Transient, auto-dismissing user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Tone.
    pub level: NotificationLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// Success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Side effect the host should perform; delivery is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Show a toast.
    Toast(Notification),
    /// Smooth-scroll to the result region once `after` has elapsed.
    ScrollToResults {
        /// Delay before scrolling.
        after: Duration,
    },
    /// Clear the native file input so the same file can be chosen again.
    ResetFileInput,
}

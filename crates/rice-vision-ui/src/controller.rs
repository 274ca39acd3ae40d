//! Upload controller: selection lifecycle and the single outbound request.

use rice_vision_core::{CandidateImage, DetectionResult, SelectedFile, SelectionError};
use rice_vision_upload::{
    ClassificationRequest, ClassifierClient, FailureClass, classify_upload_error,
};
use thiserror::Error;

use crate::{
    Handoff, HandoffInbox, Notification, PresentInputs, PresentationState,
    SCROLL_TO_RESULTS_DELAY, UiEffect,
};

const MSG_INVALID_TYPE: &str = "Please upload a valid image file";
const MSG_TOO_LARGE: &str = "File size exceeds 5MB limit";
const MSG_UNREADABLE: &str = "Could not read the selected file";
const MSG_NO_IMAGE: &str = "Please select an image first";
const MSG_ANALYSIS_FAILED: &str = "Error analyzing image";

/// Event payload a file arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Files dropped onto the drop zone.
    DragDrop(Vec<SelectedFile>),
    /// Files chosen through the file picker.
    FilePicker(Vec<SelectedFile>),
}

impl FileSource {
    fn into_first(self) -> Option<SelectedFile> {
        match self {
            Self::DragDrop(files) | Self::FilePicker(files) => files.into_iter().next(),
        }
    }
}

/// Result of [`UploadController::select_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// File became the new candidate image.
    Accepted,
    /// Event carried no file; nothing changed.
    Ignored,
    /// File refused; previous candidate kept.
    Rejected(SelectionError),
}

/// Why a submission was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    /// No candidate image is selected.
    #[error("no image selected")]
    NoCandidate,
    /// A submission for this image is already running.
    #[error("analysis already in progress")]
    InFlight,
}

/// Collapsed failure of one analysis attempt.
///
/// Transport errors, non-2xx replies and unusable bodies all land here; the
/// class is kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("analysis failed ({}): {detail}", .class.as_str())]
pub struct AnalysisFailure {
    /// Diagnostic category of the underlying error.
    pub class: FailureClass,
    /// Underlying error text.
    pub detail: String,
}

/// Owned work item for one classification request.
#[derive(Clone)]
pub struct PendingSubmission {
    generation: u64,
    request: ClassificationRequest,
    client: ClassifierClient,
}

impl PendingSubmission {
    /// Candidate generation this submission was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Performs the network call. Safe to run on another task.
    pub async fn run(self) -> CompletedSubmission {
        let outcome = self
            .client
            .classify(&self.request)
            .await
            .map_err(|error| AnalysisFailure {
                class: classify_upload_error(&error),
                detail: error.to_string(),
            });

        CompletedSubmission {
            generation: self.generation,
            outcome,
        }
    }
}

/// Finished network call, not yet applied to a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSubmission {
    /// Candidate generation the request was issued for.
    pub generation: u64,
    /// Normalized result or collapsed failure.
    pub outcome: Result<DetectionResult, AnalysisFailure>,
}

/// What applying a completed submission did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Result stored; state is `populated`.
    Populated(DetectionResult),
    /// Failure recorded; state is `error`.
    Failed(AnalysisFailure),
    /// Submission could not start.
    Rejected(SubmitRejection),
    /// Candidate was cleared or replaced meanwhile; state untouched.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Loading,
    Populated(DetectionResult),
    Failed,
}

/// Owns the candidate image, the presentation state and the effect outbox.
pub struct UploadController {
    client: ClassifierClient,
    candidate: Option<CandidateImage>,
    generation: u64,
    phase: Phase,
    effects: Vec<UiEffect>,
}

impl UploadController {
    /// Creates an empty controller submitting through `client`.
    pub fn new(client: ClassifierClient) -> Self {
        Self {
            client,
            candidate: None,
            generation: 0,
            phase: Phase::Idle,
            effects: Vec::new(),
        }
    }

    /// Current presentation state.
    pub fn state(&self) -> PresentationState {
        if self.candidate.is_none() {
            return PresentationState::Empty;
        }

        match &self.phase {
            Phase::Idle => PresentationState::Ready,
            Phase::Loading => PresentationState::Loading,
            Phase::Populated(result) => PresentationState::Populated(result.clone()),
            Phase::Failed => PresentationState::Error,
        }
    }

    /// Selected image, if any.
    pub fn candidate(&self) -> Option<&CandidateImage> {
        self.candidate.as_ref()
    }

    /// Preview data-URI of the selected image.
    pub fn preview_data_uri(&self) -> Option<&str> {
        self.candidate.as_ref().map(CandidateImage::preview_data_uri)
    }

    /// Latest detection result, if the state is `populated`.
    pub fn result(&self) -> Option<&DetectionResult> {
        match &self.phase {
            Phase::Populated(result) => Some(result),
            _ => None,
        }
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Drains queued effects in emission order.
    pub fn take_effects(&mut self) -> Vec<UiEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Takes the first file of `source` as the new candidate image.
    ///
    /// A refused file leaves the previous candidate and state untouched and
    /// queues an error toast. An accepted file replaces the candidate, drops
    /// any result tied to the old one and returns the state to `ready`.
    pub fn select_file(&mut self, source: FileSource) -> SelectOutcome {
        let Some(file) = source.into_first() else {
            return SelectOutcome::Ignored;
        };

        let name = file.name.clone();
        match CandidateImage::from_selection(file) {
            Ok(candidate) => {
                tracing::debug!(
                    file = %name,
                    fingerprint = %candidate.fingerprint(),
                    bytes = candidate.size_bytes(),
                    "candidate image accepted"
                );
                self.candidate = Some(candidate);
                self.generation += 1;
                self.phase = Phase::Idle;
                SelectOutcome::Accepted
            }
            Err(error) => {
                tracing::warn!(file = %name, %error, "candidate image rejected");
                self.toast(Notification::error(selection_message(&error)));
                SelectOutcome::Rejected(error)
            }
        }
    }

    /// Discards the candidate, any result, and resets the file input.
    pub fn clear_selection(&mut self) {
        if self.candidate.is_some() {
            self.generation += 1;
        }
        self.candidate = None;
        self.phase = Phase::Idle;
        self.effects.push(UiEffect::ResetFileInput);
    }

    /// Moves to `loading` and hands back the request to run.
    ///
    /// A second call while loading is ignored without a network call or toast.
    ///
    /// # Errors
    /// [`SubmitRejection::NoCandidate`] (with a toast) when nothing is
    /// selected; [`SubmitRejection::InFlight`] while loading.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, SubmitRejection> {
        let Some(candidate) = &self.candidate else {
            tracing::warn!("submission requested without a candidate image");
            self.toast(Notification::error(MSG_NO_IMAGE));
            return Err(SubmitRejection::NoCandidate);
        };

        if self.phase == Phase::Loading {
            tracing::debug!("submission ignored, one is already in flight");
            return Err(SubmitRejection::InFlight);
        }

        let request = ClassificationRequest::from_candidate(candidate);
        tracing::info!(
            fingerprint = %request.fingerprint(),
            endpoint = %self.client.endpoint(),
            "submitting image for analysis"
        );
        self.phase = Phase::Loading;

        Ok(PendingSubmission {
            generation: self.generation,
            request,
            client: self.client.clone(),
        })
    }

    /// Applies a finished submission.
    ///
    /// Completions for a cleared or replaced candidate are discarded.
    pub fn complete_submission(&mut self, completed: CompletedSubmission) -> SubmissionOutcome {
        if completed.generation != self.generation || self.phase != Phase::Loading {
            tracing::debug!(
                generation = completed.generation,
                current = self.generation,
                "stale analysis completion discarded"
            );
            return SubmissionOutcome::Discarded;
        }

        match completed.outcome {
            Ok(result) => {
                tracing::info!(
                    disease = %result.disease,
                    confidence = result.confidence,
                    severity = %result.severity,
                    "analysis succeeded"
                );
                self.toast(Notification::success(format!("Prediction: {}", result.disease)));
                self.effects.push(UiEffect::ScrollToResults {
                    after: SCROLL_TO_RESULTS_DELAY,
                });
                self.phase = Phase::Populated(result.clone());
                SubmissionOutcome::Populated(result)
            }
            Err(failure) => {
                tracing::warn!(
                    class = failure.class.as_str(),
                    detail = %failure.detail,
                    "analysis failed"
                );
                self.toast(Notification::error(MSG_ANALYSIS_FAILED));
                self.phase = Phase::Failed;
                SubmissionOutcome::Failed(failure)
            }
        }
    }

    /// Begins, runs and applies one submission.
    pub async fn submit_for_analysis(&mut self) -> SubmissionOutcome {
        match self.begin_submission() {
            Ok(pending) => {
                let completed = pending.run().await;
                self.complete_submission(completed)
            }
            Err(rejection) => SubmissionOutcome::Rejected(rejection),
        }
    }

    /// Inputs for a [`crate::ResultPresenter`] mounted beside this controller.
    ///
    /// `None` while there is nothing to show (empty, ready or error).
    pub fn present_inputs(&self, progress: f32, phase: &str) -> Option<PresentInputs> {
        match &self.phase {
            Phase::Loading => Some(PresentInputs::loading(progress, phase)),
            Phase::Populated(result) => Some(PresentInputs::with_result(
                result.clone(),
                self.preview_data_uri().map(str::to_string),
            )),
            Phase::Idle | Phase::Failed => None,
        }
    }

    /// Writes the current result and preview into `inbox` ahead of navigation.
    ///
    /// Returns `false` when there is no result to hand off.
    pub fn hand_off_to(&self, inbox: &HandoffInbox) -> bool {
        let Some(result) = self.result() else {
            return false;
        };

        inbox.deposit(Handoff {
            result: result.clone(),
            preview: self.preview_data_uri().map(str::to_string),
        });
        true
    }

    fn toast(&mut self, notification: Notification) {
        self.effects.push(UiEffect::Toast(notification));
    }
}

fn selection_message(error: &SelectionError) -> &'static str {
    match error {
        SelectionError::UnsupportedType(_) => MSG_INVALID_TYPE,
        SelectionError::TooLarge { .. } => MSG_TOO_LARGE,
        SelectionError::Unreadable(_) => MSG_UNREADABLE,
    }
}

//! Result presenter: chooses one view from loading flag, direct result, or a
//! recovered handoff.

use std::fmt;
use std::sync::Arc;

use rice_vision_core::DetectionResult;

use crate::HandoffInbox;

/// Text of the recovery-miss view.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Everything the presenter is given by its host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentInputs {
    /// Result supplied directly by a controller in the same view.
    pub result: Option<DetectionResult>,
    /// Preview data-URI to show beside the result.
    pub image: Option<String>,
    /// Whether a submission is in flight.
    pub loading: bool,
    /// Progress in percent.
    pub progress: f32,
    /// Human-readable phase label.
    pub phase: String,
}

impl PresentInputs {
    /// Inputs for the loading view.
    pub fn loading(progress: f32, phase: impl Into<String>) -> Self {
        Self {
            loading: true,
            progress,
            phase: phase.into(),
            ..Self::default()
        }
    }

    /// Inputs carrying a direct result.
    pub fn with_result(result: DetectionResult, image: Option<String>) -> Self {
        Self {
            result: Some(result),
            image,
            ..Self::default()
        }
    }
}

/// Display-ready form of a detection result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    /// Disease label.
    pub disease: String,
    /// Confidence formatted with two decimals, never rescaled.
    pub confidence: String,
    /// Severity label.
    pub severity: String,
    /// Description text.
    pub description: String,
    /// Treatment text.
    pub treatment: String,
    /// Analysed image, when available.
    pub image: Option<String>,
}

impl ResultCard {
    fn new(result: &DetectionResult, image: Option<String>) -> Self {
        Self {
            disease: result.disease.clone(),
            confidence: result.confidence_label(),
            severity: result.severity.to_string(),
            description: result.description.clone(),
            treatment: result.treatment.clone(),
            image,
        }
    }
}

/// The one view the presenter renders.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView {
    /// Progress indicator.
    Loading {
        /// Percent complete, clamped to `0..=100`.
        progress: f32,
        /// Phase label.
        phase: String,
    },
    /// Detection result.
    Populated(ResultCard),
    /// Nothing supplied and nothing recovered.
    NoResults {
        /// Message shown to the user.
        message: String,
    },
}

impl RenderedView {
    /// Short lowercase label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::Populated(_) => "populated",
            Self::NoResults { .. } => "no_results",
        }
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading { progress, phase } => write!(f, "[{progress:>3.0}%] {phase}"),
            Self::NoResults { message } => f.write_str(message),
            Self::Populated(card) => {
                writeln!(f, "Detection Results")?;
                writeln!(f, "  Disease:     {}", card.disease)?;
                writeln!(f, "  Confidence:  {}", card.confidence)?;
                writeln!(f, "  Severity:    {}", card.severity)?;
                writeln!(f, "  Description: {}", card.description)?;
                write!(f, "  Treatment:   {}", card.treatment)?;
                if let Some(image) = &card.image {
                    write!(f, "\n  Image:       {} bytes of preview", image.len())?;
                }
                Ok(())
            }
        }
    }
}

/// Renders results, recovering a handed-off result when none is supplied.
#[derive(Debug, Clone)]
pub struct ResultPresenter {
    inbox: Arc<HandoffInbox>,
}

impl ResultPresenter {
    /// Creates a presenter reading handoffs from `inbox`.
    pub fn new(inbox: Arc<HandoffInbox>) -> Self {
        Self { inbox }
    }

    /// Resolves the view for `inputs`.
    ///
    /// Order: loading, then direct result, then a one-shot take from the
    /// inbox, then the no-results view. Only the recovery step has a side
    /// effect (it empties the inbox).
    pub fn present(&self, inputs: &PresentInputs) -> RenderedView {
        if inputs.loading {
            return RenderedView::Loading {
                progress: clamp_progress(inputs.progress),
                phase: inputs.phase.clone(),
            };
        }

        if let Some(result) = &inputs.result {
            return RenderedView::Populated(ResultCard::new(result, inputs.image.clone()));
        }

        match self.inbox.take() {
            Some(handoff) => {
                tracing::debug!(disease = %handoff.result.disease, "result recovered from handoff");
                RenderedView::Populated(ResultCard::new(&handoff.result, handoff.preview))
            }
            None => {
                tracing::debug!("no direct result and nothing to recover");
                RenderedView::NoResults {
                    message: NO_RESULTS_MESSAGE.to_string(),
                }
            }
        }
    }
}

fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 100.0)
    }
}

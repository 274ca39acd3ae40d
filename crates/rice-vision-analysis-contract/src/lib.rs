#![warn(missing_docs)]
//! # rice-vision-analysis-contract
//!
//! ## Purpose
//! Defines the classification service response shape and its normalization
//! into a [`DetectionResult`].
//!
//! ## Responsibilities
//! - Decode the loosely-typed service payload.
//! - Require `disease` and `confidence`; default the optional text fields.
//! - Extract the service's `{"error": ...}` body for diagnostics.
//!
//! ## Data flow
//! 2xx response body -> [`parse_classification_response`] ->
//! [`DetectionResult`] handed to the upload controller.
//!
//! ## Error model
//! Invalid JSON or a missing/blank required field returns
//! [`AnalysisContractError`]. No partially-populated result is ever returned.
//!
//! ## Confidence units
//! Deployments have answered with both `0..=1` and `0..=100` scores. The value
//! is passed through as an opaque number; only non-finite values are refused.

use rice_vision_core::{DetectionResult, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Treatment text used when the service sends none.
pub const DEFAULT_TREATMENT: &str = "Consult agricultural experts for better disease management.";

/// Raw payload as sent by the classification service.
///
/// Every field is optional on the wire; [`normalize_response`] decides which
/// absences are fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    /// Predicted disease label (required).
    #[serde(default)]
    pub disease: Option<String>,
    /// Model score (required).
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Severity label.
    #[serde(default)]
    pub severity: Option<String>,
    /// Explanation text.
    #[serde(default)]
    pub description: Option<String>,
    /// Treatment recommendation.
    #[serde(default)]
    pub treatment: Option<String>,
}

/// Error body returned by the service on 4xx/5xx.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceErrorBody {
    /// Human-readable server message.
    pub error: String,
}

/// Parses a raw 2xx body into a normalized detection result.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON or wrongly-typed
/// fields, and [`AnalysisContractError::MissingField`] /
/// [`AnalysisContractError::InvalidContract`] from [`normalize_response`].
pub fn parse_classification_response(raw: &str) -> Result<DetectionResult, AnalysisContractError> {
    let parsed: ClassificationResponse =
        serde_json::from_str(raw).map_err(AnalysisContractError::Decode)?;
    normalize_response(parsed)
}

/// Applies required-field checks and defaults to a decoded payload.
///
/// # Errors
/// Returns [`AnalysisContractError::MissingField`] when `disease` is absent or
/// blank, or `confidence` is absent. Returns
/// [`AnalysisContractError::InvalidContract`] for a non-finite confidence.
pub fn normalize_response(
    response: ClassificationResponse,
) -> Result<DetectionResult, AnalysisContractError> {
    let disease = non_blank(response.disease).ok_or(AnalysisContractError::MissingField("disease"))?;
    let confidence = response
        .confidence
        .ok_or(AnalysisContractError::MissingField("confidence"))?;

    if !confidence.is_finite() {
        return Err(AnalysisContractError::InvalidContract(
            "confidence is not a finite number".to_string(),
        ));
    }

    let severity = response
        .severity
        .as_deref()
        .map(Severity::parse)
        .unwrap_or_default();
    let description =
        non_blank(response.description).unwrap_or_else(|| default_description(&disease));
    let treatment = non_blank(response.treatment).unwrap_or_else(|| DEFAULT_TREATMENT.to_string());

    Ok(DetectionResult {
        disease,
        confidence,
        severity,
        description,
        treatment,
    })
}

/// Description used when the service sends none.
pub fn default_description(disease: &str) -> String {
    format!("Detected {disease}. Further analysis is recommended.")
}

/// Extracts the `error` message from a failure body, if it has one.
pub fn parse_service_error(raw: &str) -> Option<String> {
    serde_json::from_str::<ServiceErrorBody>(raw)
        .ok()
        .map(|body| body.error)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Classification contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// Body is not JSON or a field has the wrong type.
    #[error("classification decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// A required field is absent or blank.
    #[error("classification response missing required field `{0}`")]
    MissingField(&'static str),
    /// Payload violates a contract invariant.
    #[error("classification contract violation: {0}")]
    InvalidContract(String),
}

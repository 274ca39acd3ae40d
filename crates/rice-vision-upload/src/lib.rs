#![warn(missing_docs)]
//! # rice-vision-upload
//!
//! ## Purpose
//! Client for the external classification endpoint.
//!
//! ## Responsibilities
//! - Validate the configured endpoint URL.
//! - Send one multipart `POST` carrying the raw image under the `image` field.
//! - Turn the reply into a [`DetectionResult`] or an [`UploadError`].
//! - Provide the `reqwest` transport, an offline [`MockClassifier`] and a
//!   health probe.
//!
//! ## Data flow
//! [`ClassificationRequest`] -> [`ClassifierClient::classify`] ->
//! [`ClassificationTransport::post_image`] -> status check ->
//! `parse_classification_response` -> [`DetectionResult`].
//!
//! ## Error model
//! Every failure (transport, non-2xx status, contract) is an [`UploadError`].
//! There is no retry; the caller decides what the user sees.
//!
//! ## Privacy notes
//! Requests are logged by fingerprint and size only.

mod mock;
mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use rice_vision_analysis_contract::{
    AnalysisContractError, parse_classification_response, parse_service_error,
};
use rice_vision_core::{CandidateImage, DetectionResult, image_fingerprint};
use thiserror::Error;
use url::Url;

pub use mock::{MockClassifier, MockDisease, mock_disease_table};
pub use transport::ReqwestTransport;

/// Multipart field name the service reads the image from.
pub const IMAGE_FIELD_NAME: &str = "image";

/// One image upload, detached from controller state.
#[derive(Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    /// File name sent with the multipart part.
    pub file_name: String,
    /// MIME type sent with the multipart part.
    pub mime_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl ClassificationRequest {
    /// Copies the upload-relevant parts of a candidate image.
    pub fn from_candidate(candidate: &CandidateImage) -> Self {
        Self {
            file_name: upload_file_name(candidate.name(), candidate.mime_type()),
            mime_type: candidate.mime_type().to_string(),
            bytes: candidate.bytes().to_vec(),
        }
    }

    /// Short content fingerprint for logs.
    pub fn fingerprint(&self) -> String {
        image_fingerprint(&self.bytes)
    }
}

impl std::fmt::Debug for ClassificationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRequest")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Falls back to `image.<subtype>` when the source gave no usable name.
fn upload_file_name(name: &str, mime_type: &str) -> String {
    if !name.trim().is_empty() {
        return name.to_string();
    }
    let subtype = mime_type.split_once('/').map_or("jpeg", |(_, subtype)| subtype);
    format!("image.{subtype}")
}

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by [`ClassifierClient`].
#[async_trait]
pub trait ClassificationTransport: Send + Sync {
    /// Sends the image as a multipart form to `endpoint`.
    async fn post_image(
        &self,
        endpoint: &Url,
        request: &ClassificationRequest,
    ) -> Result<TransportResponse, UploadError>;

    /// Issues a `GET` to `endpoint` and returns the status code.
    async fn probe(&self, endpoint: &Url) -> Result<u16, UploadError>;
}

/// Classification client bound to one endpoint.
#[derive(Clone)]
pub struct ClassifierClient {
    endpoint: Url,
    transport: Arc<dyn ClassificationTransport>,
}

impl std::fmt::Debug for ClassifierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ClassifierClient {
    /// Creates a client after validating `endpoint`.
    ///
    /// # Errors
    /// Returns [`UploadError::InvalidEndpoint`] when the URL is unparsable, is
    /// not http(s), or has no host.
    pub fn new(
        endpoint: &str,
        transport: Arc<dyn ClassificationTransport>,
    ) -> Result<Self, UploadError> {
        let endpoint = validate_endpoint(endpoint)?;
        if endpoint.scheme() != "https" {
            tracing::warn!(endpoint = %endpoint, "classification endpoint is not https");
        }
        Ok(Self {
            endpoint,
            transport,
        })
    }

    /// Configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submits one image and normalizes the reply.
    ///
    /// # Errors
    /// - Transport failures from the underlying [`ClassificationTransport`].
    /// - [`UploadError::Client`], [`UploadError::Server`] or
    ///   [`UploadError::UnexpectedStatus`] for non-2xx replies; the body is
    ///   not parsed as a result.
    /// - [`UploadError::Contract`] when a 2xx body is not a valid result.
    #[tracing::instrument(
        name = "classify",
        skip_all,
        fields(fingerprint = %request.fingerprint(), bytes = request.bytes.len())
    )]
    pub async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<DetectionResult, UploadError> {
        let response = self.transport.post_image(&self.endpoint, request).await?;

        if !response.is_success() {
            let server_message = parse_service_error(&response.body);
            tracing::warn!(
                status = response.status,
                server_message = server_message.as_deref().unwrap_or("<none>"),
                "classification endpoint returned failure status"
            );
            return Err(status_error(response.status));
        }

        let result = parse_classification_response(&response.body)?;
        tracing::debug!(disease = %result.disease, "classification response parsed");
        Ok(result)
    }

    /// Returns `true` when the endpoint answers a `GET` with 2xx.
    ///
    /// # Errors
    /// Propagates transport failures.
    pub async fn health_check(&self) -> Result<bool, UploadError> {
        let status = self.transport.probe(&self.endpoint).await?;
        tracing::debug!(status, "classification endpoint probed");
        Ok((200..300).contains(&status))
    }
}

/// Validates a classification endpoint URL.
///
/// # Errors
/// Returns [`UploadError::InvalidEndpoint`] for unparsable URLs, schemes other
/// than http/https, or URLs without a host.
pub fn validate_endpoint(endpoint: &str) -> Result<Url, UploadError> {
    let parsed = Url::parse(endpoint.trim())
        .map_err(|error| UploadError::InvalidEndpoint(format!("invalid url: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UploadError::InvalidEndpoint(format!(
            "unsupported scheme `{}`",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UploadError::InvalidEndpoint("url has no host".to_string()));
    }

    Ok(parsed)
}

fn status_error(status: u16) -> UploadError {
    match status {
        400..=499 => UploadError::Client(status),
        500..=599 => UploadError::Server(status),
        _ => UploadError::UnexpectedStatus(status),
    }
}

/// Coarse failure categories used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Request never produced an HTTP status (connect, timeout, I/O).
    Transport,
    /// Service rejected the request (4xx).
    Client,
    /// Service failed (5xx or other non-2xx).
    Server,
    /// 2xx reply that was not a valid result.
    Contract,
    /// Local configuration or request construction problem.
    Local,
}

impl FailureClass {
    /// Lowercase label for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Client => "client",
            Self::Server => "server",
            Self::Contract => "contract",
            Self::Local => "local",
        }
    }
}

/// Maps an upload error onto its [`FailureClass`].
pub fn classify_upload_error(error: &UploadError) -> FailureClass {
    match error {
        UploadError::Transport(_) | UploadError::Timeout => FailureClass::Transport,
        UploadError::Client(_) => FailureClass::Client,
        UploadError::Server(_) | UploadError::UnexpectedStatus(_) => FailureClass::Server,
        UploadError::Contract(_) => FailureClass::Contract,
        UploadError::InvalidEndpoint(_) | UploadError::InvalidRequest(_) => FailureClass::Local,
    }
}

/// Errors from the classification client.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Endpoint URL is not usable.
    #[error("invalid classification endpoint: {0}")]
    InvalidEndpoint(String),
    /// Request could not be built.
    #[error("invalid classification request: {0}")]
    InvalidRequest(String),
    /// Network-level failure.
    #[error("classification transport failure: {0}")]
    Transport(String),
    /// Transport gave up waiting.
    #[error("classification request timed out")]
    Timeout,
    /// 4xx reply.
    #[error("classification rejected with status {0}")]
    Client(u16),
    /// 5xx reply.
    #[error("classification service failed with status {0}")]
    Server(u16),
    /// Any other non-2xx reply.
    #[error("unexpected classification status {0}")]
    UnexpectedStatus(u16),
    /// 2xx reply that violates the response contract.
    #[error(transparent)]
    Contract(#[from] AnalysisContractError),
}

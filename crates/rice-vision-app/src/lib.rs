#![warn(missing_docs)]
//! # rice-vision-app
//!
//! ## Purpose
//! Wires configuration, logging, the classification client, the upload
//! controller and the result presenter into a runnable application.
//!
//! ## Responsibilities
//! - Load [`AppConfig`] from the environment (optionally via `.env`).
//! - Install the `tracing` subscriber.
//! - Build a [`ClassifierClient`] over the real or mock transport.
//! - Drive one file through select -> submit -> present for the CLI.
//!
//! ## Data flow
//! env -> [`AppConfig`] -> [`build_client`] -> [`UploadController`] ->
//! [`analyze_path`] -> [`AnalysisReport`] printed by the binary.
//!
//! ## Error model
//! Setup problems are [`AppError`]s. Analysis failures are not: they arrive
//! as state and toasts inside the report.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rice_vision_core::{SelectedFile, SelectionError};
use rice_vision_ui::{
    FileSource, PresentationState, RenderedView, ResultPresenter, UiEffect, UploadController,
};
use rice_vision_upload::{
    ClassificationTransport, ClassifierClient, MockClassifier, ReqwestTransport, UploadError,
};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("RICE_VISION_VERSION");

/// Endpoint used when `RICE_VISION_ENDPOINT` is unset.
pub const DEFAULT_ENDPOINT: &str = "https://ricevision-2.onrender.com/";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "rice_vision=info";

/// Artificial inference delay of the mock classifier.
pub const MOCK_LATENCY: Duration = Duration::from_secs(2);

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Classification endpoint.
    pub endpoint: String,
    /// Transport timeout; `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
    /// Use the offline mock classifier.
    pub mock: bool,
    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
            mock: false,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    ///
    /// | Env Var                    | Default                              |
    /// |----------------------------|--------------------------------------|
    /// | `RICE_VISION_ENDPOINT`     | `https://ricevision-2.onrender.com/` |
    /// | `RICE_VISION_TIMEOUT_SECS` | unset                                |
    /// | `RICE_VISION_MOCK`         | `false`                              |
    /// | `RICE_VISION_LOG_FORMAT`   | `pretty`                             |
    ///
    /// # Errors
    /// Returns [`AppError::Config`] for unparsable values.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] for unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(endpoint) = non_empty(lookup("RICE_VISION_ENDPOINT")) {
            Url::parse(&endpoint).map_err(|error| {
                AppError::Config(format!("RICE_VISION_ENDPOINT is not a url: {error}"))
            })?;
            config.endpoint = endpoint;
        }

        if let Some(raw) = non_empty(lookup("RICE_VISION_TIMEOUT_SECS")) {
            let seconds: u64 = raw.parse().map_err(|_| {
                AppError::Config(format!("RICE_VISION_TIMEOUT_SECS must be whole seconds, got {raw:?}"))
            })?;
            if seconds == 0 {
                return Err(AppError::Config(
                    "RICE_VISION_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.request_timeout = Some(Duration::from_secs(seconds));
        }

        if let Some(raw) = non_empty(lookup("RICE_VISION_MOCK")) {
            config.mock = flag_enabled(&raw);
        }

        if let Some(raw) = non_empty(lookup("RICE_VISION_LOG_FORMAT")) {
            config.log_format = match raw.to_ascii_lowercase().as_str() {
                "pretty" | "text" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                other => {
                    return Err(AppError::Config(format!(
                        "RICE_VISION_LOG_FORMAT must be `pretty` or `json`, got {other:?}"
                    )));
                }
            };
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Interprets an on/off flag value.
///
/// `1`, `true`, `on` (case-insensitive) => enabled; anything else =>
/// disabled.
pub fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on"
    )
}

/// Installs the global `tracing` subscriber writing to stderr.
///
/// # Errors
/// Returns [`AppError::Logging`] when a subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let (pretty, json) = match format {
        LogFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}

/// Builds the classification client described by `config`.
///
/// # Errors
/// Returns [`AppError::Upload`] for an invalid endpoint or an HTTP client
/// that cannot be constructed.
pub fn build_client(config: &AppConfig) -> Result<ClassifierClient, AppError> {
    let transport: Arc<dyn ClassificationTransport> = if config.mock {
        tracing::info!("using offline mock classifier");
        Arc::new(MockClassifier::from_clock().with_latency(MOCK_LATENCY))
    } else {
        match config.request_timeout {
            Some(timeout) => Arc::new(ReqwestTransport::with_timeout(timeout)?),
            None => Arc::new(ReqwestTransport::new()),
        }
    };

    Ok(ClassifierClient::new(&config.endpoint, transport)?)
}

/// Guesses an image MIME type from the file extension.
///
/// Unknown extensions map to `application/octet-stream`, which selection
/// validation then refuses.
pub fn guess_image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Everything the CLI prints after one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Final controller state.
    pub state: PresentationState,
    /// Presenter output; `None` when there was nothing to present.
    pub view: Option<RenderedView>,
    /// Effects emitted along the way, in order.
    pub effects: Vec<UiEffect>,
}

impl AnalysisReport {
    /// Returns `true` when the analysis produced a result.
    pub fn succeeded(&self) -> bool {
        matches!(self.state, PresentationState::Populated(_))
    }
}

/// Selects `path`, submits it and renders the outcome.
///
/// # Errors
/// Returns [`AppError::Selection`] when the file's metadata cannot be read.
/// Validation refusals and analysis failures are reported inside the
/// [`AnalysisReport`].
pub async fn analyze_path(
    controller: &mut UploadController,
    presenter: &ResultPresenter,
    path: &Path,
) -> Result<AnalysisReport, AppError> {
    let selection = SelectedFile::from_path(path, guess_image_mime(path))?;
    controller.select_file(FileSource::FilePicker(vec![selection]));
    let mut effects = controller.take_effects();

    if controller.candidate().is_some() {
        controller.submit_for_analysis().await;
        effects.extend(controller.take_effects());
    }

    let view = controller
        .present_inputs(100.0, "Analysis complete")
        .map(|inputs| presenter.present(&inputs));

    Ok(AnalysisReport {
        state: controller.state(),
        view,
        effects,
    })
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
    /// Logging could not be initialised.
    #[error("logging error: {0}")]
    Logging(String),
    /// Command line could not be understood.
    #[error("usage error: {0}")]
    Usage(String),
    /// Classification client error.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),
    /// Selected file could not be inspected.
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),
}

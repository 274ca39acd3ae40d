#![warn(missing_docs)]
//! # rice-vision-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `rice-vision` workspace.
//!
//! ## Responsibilities
//! - Validate a user-selected file against the accepted image types and the
//!   5 MiB size ceiling.
//! - Own the accepted [`CandidateImage`] and derive its local preview data-URI.
//! - Represent the normalized [`DetectionResult`] and its [`Severity`].
//!
//! ## Data flow
//! File picker or drop target yields a [`SelectedFile`] ->
//! [`CandidateImage::from_selection`] validates and reads it -> the bytes are
//! submitted upstream, the preview is rendered locally.
//!
//! ## Ownership and lifetimes
//! Candidate images own their byte buffer and preview string so the controller
//! can hand them to async submission without borrowing UI state.
//!
//! ## Error model
//! Selection failures return [`SelectionError`]. Validation always happens on
//! declared metadata before any file contents are read.
//!
//! ## Privacy notes
//! Image bytes and data-URIs are never meant for logs; use
//! [`image_fingerprint`] to identify an image in diagnostics.
//!
//! ## Example
//! ```rust
//! use rice_vision_core::{CandidateImage, SelectedFile};
//!
//! let file = SelectedFile::from_bytes("leaf.png", "image/PNG", vec![0x89, b'P', b'N', b'G']);
//! let candidate = CandidateImage::from_selection(file).expect("png is accepted");
//! assert!(candidate.preview_data_uri().starts_with("data:image/png;base64,"));
//! ```

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Largest accepted image, inclusive (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted `image/*` subtypes, compared case-insensitively.
pub const ALLOWED_IMAGE_SUBTYPES: [&str; 5] = ["jpeg", "jpg", "png", "gif", "bmp"];

/// Where the contents of a selected file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    /// Contents already held in memory (drop payloads, tests).
    Bytes(Vec<u8>),
    /// Contents still on disk; read only after validation passes.
    Path(PathBuf),
}

/// One file handed over by a file picker or a drag-and-drop event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as reported by the source.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Declared size in bytes.
    pub size_bytes: u64,
    /// Backing contents.
    pub contents: FileContents,
}

impl SelectedFile {
    /// Creates an in-memory selection whose size is the buffer length.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            contents: FileContents::Bytes(bytes),
        }
    }

    /// Creates a path-backed selection using filesystem metadata for its size.
    ///
    /// # Errors
    /// Returns [`SelectionError::Unreadable`] when metadata cannot be read or
    /// the path is not a regular file.
    pub fn from_path(
        path: impl AsRef<Path>,
        mime_type: impl Into<String>,
    ) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|error| {
            SelectionError::Unreadable(format!("{}: {error}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(SelectionError::Unreadable(format!(
                "{}: not a regular file",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            mime_type: mime_type.into(),
            size_bytes: metadata.len(),
            contents: FileContents::Path(path.to_path_buf()),
        })
    }
}

/// Returns `true` when `mime_type` is one of the accepted image types.
pub fn is_allowed_image_mime(mime_type: &str) -> bool {
    let Some((kind, subtype)) = mime_type.trim().split_once('/') else {
        return false;
    };

    kind.eq_ignore_ascii_case("image")
        && ALLOWED_IMAGE_SUBTYPES
            .iter()
            .any(|allowed| subtype.eq_ignore_ascii_case(allowed))
}

/// Checks declared type and size without touching file contents.
///
/// # Errors
/// Returns [`SelectionError::UnsupportedType`] for non-image types and
/// [`SelectionError::TooLarge`] above [`MAX_IMAGE_BYTES`].
pub fn validate_selection(file: &SelectedFile) -> Result<(), SelectionError> {
    if !is_allowed_image_mime(&file.mime_type) {
        return Err(SelectionError::UnsupportedType(file.mime_type.clone()));
    }

    if file.size_bytes > MAX_IMAGE_BYTES {
        return Err(SelectionError::TooLarge {
            size: file.size_bytes,
            limit: MAX_IMAGE_BYTES,
        });
    }

    Ok(())
}

/// Accepted image awaiting analysis.
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateImage {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
    preview_data_uri: String,
}

impl CandidateImage {
    /// Validates a selection, reads its contents and derives the preview.
    ///
    /// # Errors
    /// Returns the [`validate_selection`] errors, [`SelectionError::Unreadable`]
    /// when a path cannot be read, and [`SelectionError::TooLarge`] as soon as
    /// more bytes than the limit are read.
    pub fn from_selection(file: SelectedFile) -> Result<Self, SelectionError> {
        validate_selection(&file)?;

        let bytes = match file.contents {
            FileContents::Bytes(bytes) => bytes,
            FileContents::Path(path) => read_capped(&path)?,
        };

        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(SelectionError::TooLarge {
                size: bytes.len() as u64,
                limit: MAX_IMAGE_BYTES,
            });
        }

        let mime_type = file.mime_type.trim().to_ascii_lowercase();
        let preview_data_uri = preview_data_uri(&mime_type, &bytes);

        Ok(Self {
            name: file.name,
            mime_type,
            bytes,
            preview_data_uri,
        })
    }

    /// File name reported by the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized (lowercase) MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw image bytes; these, not the preview, are submitted upstream.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the image in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Base64 data-URI for local rendering only.
    pub fn preview_data_uri(&self) -> &str {
        &self.preview_data_uri
    }

    /// Short content fingerprint for diagnostics.
    pub fn fingerprint(&self) -> String {
        image_fingerprint(&self.bytes)
    }
}

impl fmt::Debug for CandidateImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateImage")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Reads at most one byte past [`MAX_IMAGE_BYTES`] from `path`.
///
/// The declared size is not trusted: the file may have grown since its
/// metadata was read, or be a pipe or device reporting size zero.
fn read_capped(path: &Path) -> Result<Vec<u8>, SelectionError> {
    let unreadable =
        |error: std::io::Error| SelectionError::Unreadable(format!("{}: {error}", path.display()));

    let file = File::open(path).map_err(unreadable)?;
    let mut bytes = Vec::new();
    file.take(MAX_IMAGE_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(unreadable)?;
    Ok(bytes)
}

/// Builds a `data:` URI embedding `bytes` as base64.
pub fn preview_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Returns the first 16 hex characters of the SHA-256 digest of `bytes`.
pub fn image_fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(&digest[..8])
}

/// Severity reported for a detected disease.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// Moderate severity; used when the service omits the field.
    #[default]
    Moderate,
    /// High severity.
    High,
    /// Healthy leaf, nothing to treat.
    None,
    /// Value this client does not know yet, kept verbatim.
    Unrecognized(String),
}

impl Severity {
    /// Parses a severity label case-insensitively.
    ///
    /// Blank input yields the default ([`Severity::Moderate`]).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "moderate" => Self::Moderate,
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "none" => Self::None,
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }

    /// Canonical label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::None => "none",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

/// Normalized outcome of one successful classification call.
///
/// Built only from a parsed 2xx response; see
/// `rice_vision_analysis_contract::parse_classification_response`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Display label of the detected disease.
    pub disease: String,
    /// Upstream score, passed through untouched. Deployments have reported both
    /// `0..=1` and `0..=100`; callers must not assume either scale.
    pub confidence: f64,
    /// Reported or defaulted severity.
    pub severity: Severity,
    /// Explanation text.
    pub description: String,
    /// Recommended treatment text.
    pub treatment: String,
}

impl DetectionResult {
    /// Confidence formatted with two decimals, without rescaling.
    pub fn confidence_label(&self) -> String {
        format!("{:.2}", self.confidence)
    }

    /// Serializes the result to compact JSON.
    ///
    /// # Errors
    /// Returns [`serde_json::Error`] when encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a result previously written by [`DetectionResult::to_json`].
    ///
    /// # Errors
    /// Returns [`serde_json::Error`] for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Reasons a selected file is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Declared MIME type is not an accepted image type.
    #[error("unsupported file type: {0:?}")]
    UnsupportedType(String),
    /// File exceeds the size ceiling.
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Inclusive limit in bytes.
        limit: u64,
    },
    /// File contents or metadata could not be read.
    #[error("file could not be read: {0}")]
    Unreadable(String),
}

//! Shared fixtures for controller and presenter tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rice_vision_core::{DetectionResult, SelectedFile, Severity};
use rice_vision_ui::{FileSource, UploadController};
use rice_vision_upload::{
    ClassificationRequest, ClassificationTransport, ClassifierClient, TransportResponse,
    UploadError,
};
use url::Url;

/// Transport answering every request with the same scripted outcome.
pub struct FixedTransport {
    status: u16,
    body: Option<String>,
    calls: Mutex<Vec<ClassificationRequest>>,
}

impl FixedTransport {
    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<ClassificationRequest> {
        self.calls.lock().expect("calls lock should work").clone()
    }
}

#[async_trait]
impl ClassificationTransport for FixedTransport {
    async fn post_image(
        &self,
        _endpoint: &Url,
        request: &ClassificationRequest,
    ) -> Result<TransportResponse, UploadError> {
        self.calls
            .lock()
            .expect("calls lock should work")
            .push(request.clone());
        match &self.body {
            Some(body) => Ok(TransportResponse {
                status: self.status,
                body: body.clone(),
            }),
            None => Err(UploadError::Transport("connection refused".to_string())),
        }
    }

    async fn probe(&self, _endpoint: &Url) -> Result<u16, UploadError> {
        Ok(self.status)
    }
}

/// Transport replying `status` with `body`.
#[allow(dead_code)]
pub fn replying(status: u16, body: &str) -> Arc<FixedTransport> {
    Arc::new(FixedTransport {
        status,
        body: Some(body.to_string()),
        calls: Mutex::new(Vec::new()),
    })
}

/// Transport that fails before any HTTP status is received.
#[allow(dead_code)]
pub fn unreachable() -> Arc<FixedTransport> {
    Arc::new(FixedTransport {
        status: 0,
        body: None,
        calls: Mutex::new(Vec::new()),
    })
}

/// Controller wired to `transport`.
#[allow(dead_code)]
pub fn controller(transport: Arc<FixedTransport>) -> UploadController {
    let client = ClassifierClient::new("https://classifier.example.test/", transport)
        .expect("client should build");
    UploadController::new(client)
}

/// Drop event carrying one in-memory file.
#[allow(dead_code)]
pub fn dropped(name: &str, mime: &str, bytes: Vec<u8>) -> FileSource {
    FileSource::DragDrop(vec![SelectedFile::from_bytes(name, mime, bytes)])
}

/// Stand-alone detection result.
#[allow(dead_code)]
pub fn fixture_result(disease: &str) -> DetectionResult {
    DetectionResult {
        disease: disease.to_string(),
        confidence: 0.83,
        severity: Severity::Medium,
        description: format!("{disease} description"),
        treatment: format!("{disease} treatment"),
    }
}

//! Shared fixtures for upload integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rice_vision_upload::{
    ClassificationRequest, ClassificationTransport, TransportResponse, UploadError,
};
use url::Url;

/// Transport that replays one scripted outcome and records what it was sent.
#[allow(dead_code)]
pub struct ScriptedTransport {
    reply: Mutex<Option<Result<TransportResponse, UploadError>>>,
    pub sent: Mutex<Vec<ClassificationRequest>>,
}

impl ScriptedTransport {
    #[allow(dead_code)]
    pub fn replying(status: u16, body: &str) -> Arc<Self> {
        Self::with(Ok(TransportResponse {
            status,
            body: body.to_string(),
        }))
    }

    #[allow(dead_code)]
    pub fn failing(error: UploadError) -> Arc<Self> {
        Self::with(Err(error))
    }

    #[allow(dead_code)]
    fn with(reply: Result<TransportResponse, UploadError>) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Some(reply)),
            sent: Mutex::new(Vec::new()),
        })
    }

    #[allow(dead_code)]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("sent lock should work").len()
    }
}

#[async_trait]
impl ClassificationTransport for ScriptedTransport {
    async fn post_image(
        &self,
        _endpoint: &Url,
        request: &ClassificationRequest,
    ) -> Result<TransportResponse, UploadError> {
        self.sent
            .lock()
            .expect("sent lock should work")
            .push(request.clone());
        self.reply
            .lock()
            .expect("reply lock should work")
            .take()
            .unwrap_or_else(|| Err(UploadError::Transport("script exhausted".to_string())))
    }

    async fn probe(&self, _endpoint: &Url) -> Result<u16, UploadError> {
        Ok(200)
    }
}

/// Small PNG-typed request fixture.
#[allow(dead_code)]
pub fn fixture_request() -> ClassificationRequest {
    ClassificationRequest {
        file_name: "leaf.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G', 1, 2, 3],
    }
}

//! `reqwest`-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::{
    ClassificationRequest, ClassificationTransport, IMAGE_FIELD_NAME, TransportResponse, UploadError,
};

/// HTTP transport built on a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with `reqwest` defaults (no overall timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns [`UploadError::Transport`] when the client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| UploadError::Transport(error.to_string()))?;
        Ok(Self { client })
    }

    /// Reuses an existing client (connection pooling, custom TLS).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClassificationTransport for ReqwestTransport {
    async fn post_image(
        &self,
        endpoint: &Url,
        request: &ClassificationRequest,
    ) -> Result<TransportResponse, UploadError> {
        let part = Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|error| UploadError::InvalidRequest(error.to_string()))?;
        let form = Form::new().part(IMAGE_FIELD_NAME, part);

        let response = self
            .client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok(TransportResponse { status, body })
    }

    async fn probe(&self, endpoint: &Url) -> Result<u16, UploadError> {
        let response = self
            .client
            .get(endpoint.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Ok(response.status().as_u16())
    }
}

fn map_reqwest_error(error: reqwest::Error) -> UploadError {
    if error.is_timeout() {
        UploadError::Timeout
    } else {
        UploadError::Transport(error.to_string())
    }
}

//! HTTP backend for the `/analyze` endpoint.
//!
//! The request is a `multipart/form-data` POST with these fields:
//! - `prompt`: user text, or the default prompt when the text is empty
//! - `image`: raw image bytes (only when an image is attached)
//! - `model`: optional model override understood by the backend
//!
//! The response is plain text with no framing. Each body chunk is decoded on
//! its own and forwarded as a fragment; a multi-byte character split across
//! two chunks is decoded lossily rather than buffered.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use tokio::sync::mpsc::Sender;

use crate::inference::{AnalyzeBackend, AnalyzeRequest, BackendError, StreamChunk};

pub const ANALYZE_PATH: &str = "/analyze";

/// Builds the multipart form for one request.
fn build_form(request: &AnalyzeRequest<'_>) -> Result<Form, BackendError> {
    let mut form = Form::new().text("prompt", request.effective_prompt().to_string());

    if let Some(image) = request.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| BackendError::Config(format!("invalid MIME type {}: {e}", image.mime)))?;
        form = form.part("image", part);
    }

    if let Some(model) = request.model {
        form = form.text("model", model.to_string());
    }

    Ok(form)
}

/// Streams analyses from a multimodal inference server.
pub struct HttpAnalyzeBackend {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAnalyzeBackend {
    /// Creates a backend for the server at `endpoint` (scheme + host + port,
    /// e.g. `http://localhost:8000`). A trailing slash is ignored.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.endpoint, ANALYZE_PATH)
    }

    /// Sends the request and returns the response once its status is known.
    async fn send_request(
        &self,
        request: &AnalyzeRequest<'_>,
    ) -> Result<reqwest::Response, BackendError> {
        let form = build_form(request)?;

        info!(
            "POST {} (prompt_len={}, image={}, model={:?})",
            self.url(),
            request.effective_prompt().len(),
            request
                .image
                .map(|i| format!("{} {} bytes", i.mime, i.bytes.len()))
                .unwrap_or_else(|| "none".to_string()),
            request.model,
        );

        let response = self
            .client
            .post(self.url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        debug!("Analyze response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Analyze API error: {} - {}", status, err_body);
            return Err(BackendError::Api {
                status,
                message: err_body,
            });
        }

        if response.status() == StatusCode::NO_CONTENT {
            warn!("Analyze API answered 204 without a body");
            return Err(BackendError::MissingBody);
        }

        Ok(response)
    }
}

#[async_trait]
impl AnalyzeBackend for HttpAnalyzeBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn stream_analysis(
        &self,
        request: AnalyzeRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), BackendError> {
        let response = self.send_request(&request).await?;

        if sender.send(StreamChunk::Accepted).await.is_err() {
            warn!("Accepted send failed: receiver dropped");
            return Err(BackendError::ChannelClosed);
        }

        let mut body = response.bytes_stream();
        let mut chunk_count = 0usize;
        let mut total_len = 0usize;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| {
                warn!("Stream read failed after {} chunks: {}", chunk_count, e);
                BackendError::Network(e.to_string())
            })?;

            chunk_count += 1;
            total_len += chunk.len();
            debug!("Body chunk received: {} bytes (total={})", chunk.len(), total_len);

            let text = String::from_utf8_lossy(&chunk).into_owned();
            if sender.send(StreamChunk::Fragment(text)).await.is_err() {
                warn!("Fragment send failed: receiver dropped");
                return Err(BackendError::ChannelClosed);
            }
        }

        info!(
            "Stream ended: {} chunks, {} total bytes",
            chunk_count, total_len
        );
        Ok(())
    }
}

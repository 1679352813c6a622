use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use super::types::StreamChunk;

/// Errors that can occur while talking to the analysis backend.
/// Only ever logged; the user sees a single generic notice.
#[derive(Debug)]
pub enum BackendError {
    /// Backend misconfigured (bad endpoint URL).
    Config(String),
    /// Network-level failure (DNS, connection refused, mid-stream read error).
    Network(String),
    /// Backend returned a non-success status.
    Api { status: u16, message: String },
    /// Backend answered successfully but without a body to stream.
    MissingBody,
    /// The mpsc channel was closed (the ingestion side went away).
    ChannelClosed,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::MissingBody => write!(f, "response has no body"),
            BackendError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Raw image payload transmitted with a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Everything a backend needs to analyze one turn.
pub struct AnalyzeRequest<'a> {
    /// Prompt as typed by the user; may be empty when an image is present.
    pub prompt: &'a str,
    pub image: Option<&'a ImagePayload>,
    /// Prompt sent in place of an empty one.
    pub default_prompt: &'a str,
    pub model: Option<&'a str>,
}

impl AnalyzeRequest<'_> {
    /// The prompt actually sent over the wire.
    pub fn effective_prompt(&self) -> &str {
        if self.prompt.trim().is_empty() {
            self.default_prompt
        } else {
            self.prompt
        }
    }
}

#[async_trait]
pub trait AnalyzeBackend: Send + Sync {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Submits one turn and streams the response into `sender`:
    /// `Accepted` once the request is confirmed, then every fragment in order.
    /// Returns `Ok` once the body is exhausted without a read error.
    async fn stream_analysis(
        &self,
        request: AnalyzeRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), BackendError>;
}

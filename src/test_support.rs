//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::action::Submission;
use crate::core::attachment::Attachment;
use crate::core::config::{DEFAULT_PROMPT, ResolvedConfig};
use crate::core::state::App;
use crate::inference::{AnalyzeBackend, AnalyzeRequest, BackendError, StreamChunk};

/// How a `ScriptedBackend` ends its stream.
enum Outcome {
    Complete,
    /// Non-success status before any fragment.
    Rejected(u16),
    /// Read failure after the scripted fragments.
    Broken,
}

/// A backend that replays fixed fragments without any network I/O.
pub struct ScriptedBackend {
    fragments: Vec<String>,
    outcome: Outcome,
}

impl ScriptedBackend {
    pub fn ok(fragments: &[&str]) -> Self {
        Self::new(fragments, Outcome::Complete)
    }

    pub fn rejected(status: u16) -> Self {
        Self::new(&[], Outcome::Rejected(status))
    }

    pub fn broken(fragments: &[&str]) -> Self {
        Self::new(fragments, Outcome::Broken)
    }

    fn new(fragments: &[&str], outcome: Outcome) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            outcome,
        }
    }
}

#[async_trait]
impl AnalyzeBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_analysis(
        &self,
        _request: AnalyzeRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), BackendError> {
        if let Outcome::Rejected(status) = self.outcome {
            return Err(BackendError::Api {
                status,
                message: "scripted rejection".to_string(),
            });
        }

        sender
            .send(StreamChunk::Accepted)
            .await
            .map_err(|_| BackendError::ChannelClosed)?;
        for fragment in &self.fragments {
            sender
                .send(StreamChunk::Fragment(fragment.clone()))
                .await
                .map_err(|_| BackendError::ChannelClosed)?;
        }

        match self.outcome {
            Outcome::Broken => Err(BackendError::Network("connection reset".to_string())),
            _ => Ok(()),
        }
    }
}

pub fn test_config(require_image: bool) -> ResolvedConfig {
    ResolvedConfig {
        endpoint: "http://localhost:8000".to_string(),
        model: None,
        default_prompt: DEFAULT_PROMPT.to_string(),
        require_image,
    }
}

/// Creates a test App whose backend answers with nothing.
pub fn test_app() -> App {
    App::new(Arc::new(ScriptedBackend::ok(&[])), test_config(true))
}

/// Creates a test App with the image guard relaxed.
pub fn text_only_app() -> App {
    App::new(Arc::new(ScriptedBackend::ok(&[])), test_config(false))
}

/// A tiny in-memory PNG-typed attachment with bytes `abc`.
pub fn attachment_fixture(name: &str) -> Attachment {
    Attachment::from_bytes(name.to_string(), "image/png", b"abc".to_vec())
}

pub fn submission(prompt: &str) -> Submission {
    Submission {
        prompt: prompt.to_string(),
        image: Some(attachment_fixture("cat.png").payload()),
        default_prompt: DEFAULT_PROMPT.to_string(),
        model: None,
    }
}

//! # Stream Ingestion
//!
//! Drives one turn against a backend and turns its chunk stream into the
//! ordered sequence of actions the state manager consumes:
//!
//! ```text
//! StreamStarted → Fragment* → StreamEnded
//!                           ↘ StreamFailed
//! ```
//!
//! A rejected request (bad status, no body, transport error) produces a
//! single `StreamFailed` with no `StreamStarted` before it. The terminal
//! action is sent only after every fragment has been forwarded.

use std::sync::Arc;
use std::sync::mpsc;

use log::{debug, info, warn};

use crate::core::action::{Action, Submission};
use crate::inference::{AnalyzeBackend, AnalyzeRequest, StreamChunk};

/// Capacity of the chunk channel between the backend and the forwarder.
const CHUNK_BUFFER: usize = 100;

/// Runs one turn to completion. Never returns an error: every failure is
/// logged and reported to the state manager as `Action::StreamFailed`.
pub async fn run_turn(
    backend: Arc<dyn AnalyzeBackend>,
    submission: Submission,
    tx: mpsc::Sender<Action>,
) {
    info!("Starting turn on backend '{}'", backend.name());

    let (chunk_tx, chunk_rx) = tokio::sync::mpsc::channel::<StreamChunk>(CHUNK_BUFFER);

    let stream = async {
        let request = AnalyzeRequest {
            prompt: &submission.prompt,
            image: submission.image.as_ref(),
            default_prompt: &submission.default_prompt,
            model: submission.model.as_deref(),
        };
        // chunk_tx is dropped when this future completes, which ends the forwarder.
        backend.stream_analysis(request, chunk_tx).await
    };

    let forward = async {
        // Dropped on early return, so the backend's next send fails.
        let mut chunk_rx = chunk_rx;
        let mut forwarded = 0usize;
        let mut total_len = 0usize;
        while let Some(chunk) = chunk_rx.recv().await {
            let action = match chunk {
                StreamChunk::Accepted => Action::StreamStarted,
                StreamChunk::Fragment(text) => {
                    forwarded += 1;
                    total_len += text.len();
                    debug!(
                        "Forwarding Action::Fragment (len={}, total={})",
                        text.len(),
                        total_len
                    );
                    Action::Fragment(text)
                }
            };
            if tx.send(action).is_err() {
                warn!("Failed to forward stream action: receiver dropped");
                return forwarded;
            }
        }
        forwarded
    };

    let (result, forwarded) = tokio::join!(stream, forward);

    let terminal = match result {
        Ok(()) => {
            info!("Turn complete: {} fragments forwarded", forwarded);
            Action::StreamEnded
        }
        Err(e) => {
            warn!("Turn failed after {} fragments: {}", forwarded, e);
            Action::StreamFailed(e.to_string())
        }
    };

    if tx.send(terminal).is_err() {
        warn!("Failed to send terminal stream action: receiver dropped");
    }
}

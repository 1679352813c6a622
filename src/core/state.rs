//! # Application State
//!
//! Core session state for Glimpse. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn AnalyzeBackend>  // where turns are sent
//! ├── config: ResolvedConfig            // prompt default, image guard, model
//! ├── session_id: String                // correlates log lines
//! ├── log: ConversationLog              // ordered message history
//! ├── pending: Option<Attachment>       // image selected, not yet submitted
//! ├── status: SessionStatus             // idle / submitting
//! └── status_message: String            // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! The ingestion engine never touches this struct directly.

use std::sync::Arc;

use crate::core::attachment::Attachment;
use crate::core::config::ResolvedConfig;
use crate::inference::{AnalyzeBackend, ConversationLog};

/// Whether a turn is in flight. New submissions are only accepted while idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Submitting,
}

pub struct App {
    pub backend: Arc<dyn AnalyzeBackend>,
    pub config: ResolvedConfig,
    pub session_id: String,
    pub log: ConversationLog,
    pub pending: Option<Attachment>,
    pub status: SessionStatus,
    pub status_message: String,
    /// Id of the attachment sent with the in-flight turn, if any.
    pub(crate) submitted_attachment: Option<u64>,
    next_attachment_id: u64,
}

impl App {
    pub fn new(backend: Arc<dyn AnalyzeBackend>, config: ResolvedConfig) -> Self {
        Self {
            backend,
            config,
            session_id: uuid::Uuid::new_v4().to_string(),
            log: ConversationLog::new(),
            pending: None,
            status: SessionStatus::Idle,
            status_message: String::from("Ready"),
            submitted_attachment: None,
            next_attachment_id: 1,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SessionStatus::Submitting
    }

    /// Makes `attachment` the pending one, replacing any previous selection.
    pub(crate) fn set_pending(&mut self, mut attachment: Attachment) -> &Attachment {
        attachment.id = self.next_attachment_id;
        self.next_attachment_id += 1;
        self.pending.insert(attachment)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{attachment_fixture, test_app};

    use super::*;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status, SessionStatus::Idle);
        assert_eq!(app.status_message, "Ready");
        assert!(app.log.is_empty());
        assert!(app.pending.is_none());
        assert!(!app.session_id.is_empty());
    }

    #[test]
    fn test_set_pending_assigns_increasing_ids() {
        let mut app = test_app();
        let first = app.set_pending(attachment_fixture("a.png")).id;
        let second = app.set_pending(attachment_fixture("b.png")).id;
        assert!(second > first);
        assert_eq!(app.pending.as_ref().unwrap().file_name, "b.png");
    }
}

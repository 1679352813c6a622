//! # Actions
//!
//! Everything that can happen in Glimpse becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend sends a chunk? That's `Action::Fragment(text)`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing the I/O the caller
//! should perform next. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! A turn runs through these actions:
//!
//! ```text
//! Submit ─→ StreamStarted ─→ Fragment* ─→ StreamEnded
//!    │              └──────────────────→ StreamFailed
//!    └──────────────────────────────────→ StreamFailed   (request rejected)
//! ```

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::core::attachment::Attachment;
use crate::core::state::{App, SessionStatus};
use crate::inference::{ImagePayload, Message};

/// Assistant notice appended when a text-only turn hits the image guard.
pub const IMAGE_REQUIRED_NOTICE: &str = "Please select an image first. This is a multimodal chat.";

/// Assistant notice shown for every transport or response failure.
pub const FAILURE_NOTICE: &str = "Sorry, something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User chose an image file; it still has to be read.
    PickImage(PathBuf),
    AttachmentLoaded(Attachment),
    AttachmentFailed(String),
    ClearAttachment,
    Submit(String),
    /// Backend accepted the request; fragments follow.
    StreamStarted,
    Fragment(String),
    StreamEnded,
    /// Carries the diagnostic cause; never shown to the user.
    StreamFailed(String),
    Quit,
}

/// Why a submission was ignored. The state is untouched in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No trimmed text and no pending attachment.
    Empty,
    /// A turn is already in flight.
    Busy,
}

/// A frozen turn, handed to the ingestion engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub prompt: String,
    pub image: Option<ImagePayload>,
    pub default_prompt: String,
    pub model: Option<String>,
}

/// Work the caller must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Read the file and report back with `AttachmentLoaded`/`AttachmentFailed`.
    LoadAttachment(PathBuf),
    /// Run the turn and feed its stream actions back in.
    SpawnRequest(Submission),
    /// The turn was answered locally with `IMAGE_REQUIRED_NOTICE`.
    ImageRequired,
    Rejected(Rejection),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::PickImage(path) => {
            app.status_message = format!("Loading {}...", path.display());
            Effect::LoadAttachment(path)
        }
        Action::AttachmentLoaded(attachment) => {
            let attached = app.set_pending(attachment);
            info!("Attachment pending: {} (id={})", attached.file_name, attached.id);
            let message = format!("Attached {} ({})", attached.file_name, attached.size_label());
            app.status_message = message;
            Effect::None
        }
        Action::AttachmentFailed(reason) => {
            warn!("Attachment failed: {}", reason);
            app.status_message = format!("Attach failed: {reason}");
            Effect::None
        }
        Action::ClearAttachment => {
            if let Some(attachment) = app.pending.take() {
                debug!("Attachment cleared: {}", attachment.file_name);
                app.status_message = String::from("Attachment removed");
            }
            Effect::None
        }
        Action::Submit(text) => submit(app, text),
        Action::StreamStarted => {
            if app.status == SessionStatus::Idle {
                warn!("Ignoring stream start received while idle");
                return Effect::None;
            }
            app.log.begin_assistant();
            app.status_message = String::from("Receiving...");
            Effect::None
        }
        Action::Fragment(text) => {
            if app.status == SessionStatus::Idle {
                warn!("Dropping fragment received while idle ({} bytes)", text.len());
                return Effect::None;
            }
            app.log.append_fragment(&text);
            Effect::None
        }
        Action::StreamEnded => {
            app.log.finish_receiving();
            // Only clear the attachment that was actually sent.
            if let Some(sent) = app.submitted_attachment.take()
                && app.pending.as_ref().is_some_and(|a| a.id == sent)
            {
                app.pending = None;
            }
            app.status = SessionStatus::Idle;
            app.status_message = String::from("Ready");
            Effect::None
        }
        Action::StreamFailed(reason) => {
            warn!("Turn failed (session={}): {}", app.session_id, reason);
            // Partial content stays as delivered.
            let partial = app.log.finish_receiving().is_some_and(|m| !m.content.is_empty());
            if !partial {
                app.log.push(Message::assistant(FAILURE_NOTICE.to_string()));
            }
            app.submitted_attachment = None;
            app.status = SessionStatus::Idle;
            app.status_message = String::from("Request failed");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    if app.status == SessionStatus::Submitting {
        debug!("Submit ignored: turn in flight");
        return Effect::Rejected(Rejection::Busy);
    }
    if text.trim().is_empty() && app.pending.is_none() {
        debug!("Submit ignored: nothing to send");
        return Effect::Rejected(Rejection::Empty);
    }

    if app.pending.is_none() && app.config.require_image {
        info!("Submit answered locally: image required");
        app.log.push(Message::assistant(IMAGE_REQUIRED_NOTICE.to_string()));
        app.status_message = String::from("Attach an image with /attach <path>");
        return Effect::ImageRequired;
    }

    let image = app.pending.as_ref().map(Attachment::payload);
    let echo = app.pending.as_ref().map(Attachment::echo);
    app.submitted_attachment = app.pending.as_ref().map(|a| a.id);

    app.log.push(Message::user(text.clone(), echo));
    app.status = SessionStatus::Submitting;
    app.status_message = String::from("Analyzing...");

    info!(
        "Submitting turn (session={}, prompt_len={}, image={})",
        app.session_id,
        text.len(),
        image.is_some()
    );

    Effect::SpawnRequest(Submission {
        prompt: text,
        image,
        default_prompt: app.config.default_prompt.clone(),
        model: app.config.model.clone(),
    })
}

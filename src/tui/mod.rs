//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the session,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm. It is a
//! passive consumer of `App`: it re-renders after every action and forwards
//! user intents (attach, detach, submit) back into `core::update`.
//!
//! ## Event Loop
//!
//! One thread owns `App`. Background tasks (file reads, backend turns) only
//! send `Action`s over a channel; the loop applies them in arrival order.
//!
//! - **Submitting**: redraws every ~80ms for the spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events.

mod command;
mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::attachment::Attachment;
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::inference::{AnalyzeBackend, HttpAnalyzeBackend, run_turn};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core session logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(format!("Message ({})", command::HELP)),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn AnalyzeBackend> =
        Arc::new(HttpAnalyzeBackend::new(config.endpoint.clone()));
    let mut app = App::new(backend, config);
    let mut tui = TuiState::new();
    info!("Session {} started", app.session_id);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    let result = loop {
        let animating = app.is_submitting();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Quit => should_quit = true,
                TuiEvent::Resize => {}
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                }
                _ => {
                    if let Some(InputEvent::Submit(line)) = tui.input_box.handle_event(&event) {
                        let effect = update(&mut app, command::parse(&line));
                        if !matches!(effect, Effect::Rejected(_)) {
                            tui.input_box.clear();
                        }
                        if matches!(effect, Effect::SpawnRequest(_) | Effect::ImageRequired) {
                            tui.message_list.scroll_to_bottom();
                        }
                        should_quit |= perform(effect, &app, &tx);
                    }
                }
            }
        }

        // Handle background task actions (attachment loads, streamed turns)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {}", action_label(&action));
            let effect = update(&mut app, action);
            should_quit |= perform(effect, &app, &tx);
        }

        if should_quit {
            break Ok(());
        }
    };

    if app.is_submitting() {
        warn!("Exiting with a turn still in flight");
    }
    info!("Session {} ended with {} messages", app.session_id, app.log.len());

    ratatui::restore();
    result
}

/// Carries out an effect. Returns true when the app should quit.
fn perform(effect: Effect, app: &App, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::Quit => return true,
        Effect::SpawnRequest(submission) => {
            info!("Spawning analyze request");
            tokio::spawn(run_turn(app.backend.clone(), submission, tx.clone()));
        }
        Effect::LoadAttachment(path) => spawn_attachment_load(path, tx.clone()),
        Effect::Rejected(reason) => debug!("Submission rejected: {:?}", reason),
        Effect::ImageRequired | Effect::None => {}
    }
    false
}

fn spawn_attachment_load(path: PathBuf, tx: mpsc::Sender<Action>) {
    info!("Loading attachment {}", path.display());
    tokio::spawn(async move {
        let action = match Attachment::load(&path).await {
            Ok(attachment) => Action::AttachmentLoaded(attachment),
            Err(e) => Action::AttachmentFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to send attachment result: receiver dropped");
        }
    });
}

/// Short description for logging; attachments carry whole images.
fn action_label(action: &Action) -> String {
    match action {
        Action::AttachmentLoaded(a) => {
            format!("AttachmentLoaded({}, {} bytes)", a.file_name, a.bytes.len())
        }
        Action::Fragment(text) => format!("Fragment({} bytes)", text.len()),
        other => format!("{other:?}"),
    }
}

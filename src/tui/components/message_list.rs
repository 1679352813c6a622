//! # MessageList Component
//!
//! Scrollable view of the conversation log.
//!
//! Messages are pre-wrapped with `textwrap` so the total line count is known
//! before rendering; the view sticks to the bottom while new fragments
//! arrive unless the user scrolled up.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::inference::{Message, Role};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Shown when the log is empty.
pub const EMPTY_HINT: &str = "Upload an image with /attach <path> and ask a question to get started.";

/// Persistent scroll state for the message list.
#[derive(Debug)]
pub struct MessageListState {
    /// First visible line.
    pub offset: u16,
    /// Follow new content at the bottom.
    pub follow: bool,
    /// Height of the last rendered viewport, used for paging.
    viewport: u16,
    max_offset: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            follow: true,
            viewport: 0,
            max_offset: 0,
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
        self.offset = self.max_offset;
    }

    fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset);
        if self.offset == self.max_offset {
            self.follow = true;
        }
    }

    /// Clamps the offset to the content and applies follow mode.
    fn settle(&mut self, total_lines: usize, viewport: u16) {
        self.viewport = viewport;
        self.max_offset = u16::try_from(total_lines.saturating_sub(viewport as usize)).unwrap_or(u16::MAX);
        if self.follow || self.offset > self.max_offset {
            self.offset = self.max_offset;
        }
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        let page = self.viewport.saturating_sub(1).max(1);
        match event {
            TuiEvent::ScrollUp => self.scroll_up(1),
            TuiEvent::ScrollDown => self.scroll_down(1),
            TuiEvent::ScrollPageUp => self.scroll_up(page),
            TuiEvent::ScrollPageDown => self.scroll_down(page),
            TuiEvent::ScrollToBottom => self.scroll_to_bottom(),
            _ => return None,
        }
        Some(())
    }
}

fn header_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Role::Assistant => Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    }
}

/// Lays out every message as wrapped lines for a viewport `width` columns wide.
pub fn message_lines(
    messages: &[Message],
    receiving: bool,
    spinner_frame: usize,
    width: u16,
) -> Vec<Line<'static>> {
    let width = (width as usize).max(1);
    let mut lines = Vec::new();

    for (idx, message) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(vec![
            Span::styled(message.role.label(), header_style(message.role)),
            Span::styled(
                format!(" · {}", message.created_at.format("%H:%M:%S")),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]));

        if let Some(image) = &message.image {
            lines.push(Line::styled(
                format!("[image: {}]", image.file_name),
                Style::default().fg(Color::Blue),
            ));
        }

        let is_receiving = receiving && idx + 1 == messages.len();
        if is_receiving && message.content.is_empty() {
            let frame = SPINNER[spinner_frame % SPINNER.len()];
            lines.push(Line::styled(
                format!("{frame} Thinking..."),
                Style::default().add_modifier(Modifier::DIM),
            ));
            continue;
        }

        for raw in message.content.split('\n') {
            if raw.is_empty() {
                lines.push(Line::default());
                continue;
            }
            for wrapped in textwrap::wrap(raw, width) {
                lines.push(Line::raw(wrapped.into_owned()));
            }
        }
    }

    lines
}

/// # Props
///
/// - `messages`: the conversation log
/// - `receiving`: whether the last message is still streaming
/// - `spinner_frame`: animation frame for the "Thinking..." placeholder
pub struct MessageList<'a> {
    pub messages: &'a [Message],
    pub receiving: bool,
    pub spinner_frame: usize,
    pub state: &'a mut MessageListState,
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.messages.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::styled(EMPTY_HINT, Style::default().fg(Color::DarkGray)))
                    .centered(),
                area,
            );
            return;
        }

        let lines = message_lines(self.messages, self.receiving, self.spinner_frame, area.width);
        self.state.settle(lines.len(), area.height);
        frame.render_widget(Paragraph::new(lines).scroll((self.state.offset, 0)), area);
    }
}

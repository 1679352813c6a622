//! # InputBox Component
//!
//! Single-line prompt editor.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, backspace/delete, cursor movement)
//! - Emit `Submit` on Enter
//! - Scroll horizontally so the cursor stays visible
//!
//! Unlike a chat box that empties itself on Enter, the buffer is kept after
//! `Submit`: the parent clears it only once the session accepted the line,
//! so a rejected submission leaves the text in place.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    ContentChanged,
}

/// # Props
///
/// - `hint`: title shown on the border
/// - `dimmed`: rendered greyed out while a turn is in flight
pub struct InputBox {
    pub buffer: String,
    pub hint: String,
    pub dimmed: bool,
    /// Byte offset of the cursor in `buffer`, always on a char boundary.
    cursor: usize,
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map(|c| pos + c.len_utf8()).unwrap_or(pos)
}

impl InputBox {
    pub fn new(hint: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            hint: hint.into(),
            dimmed: false,
            cursor: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Returns the slice of the buffer that fits in `width` columns and the
    /// cursor column within it.
    fn visible(&self, width: usize) -> (String, usize) {
        let chars: Vec<char> = self.buffer.chars().collect();
        let cursor_col = self.buffer[..self.cursor].chars().count();
        if width == 0 {
            return (String::new(), 0);
        }
        // Keep one column free for the cursor at the end of the line.
        let start = (cursor_col + 1).saturating_sub(width);
        let end = (start + width).min(chars.len());
        (chars[start..end].iter().collect(), cursor_col - start)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let (text, cursor_col) = self.visible(inner_width);

        let color = if self.dimmed { Color::DarkGray } else { Color::Green };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(self.hint.as_str());

        frame.render_widget(
            Paragraph::new(text).block(block).style(Style::default().fg(color)),
            area,
        );

        if area.width > 2 && area.height > 2 {
            frame.set_cursor_position((area.x + 1 + cursor_col as u16, area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line editor: newlines become spaces.
                let flattened = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.cursor, &flattened);
                self.cursor += flattened.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit => Some(InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}

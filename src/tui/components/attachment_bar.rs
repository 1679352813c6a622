//! # AttachmentBar Component
//!
//! One-line preview of the pending attachment, or a hint when there is none.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::attachment::Attachment;
use crate::tui::component::Component;

pub struct AttachmentBar<'a> {
    pub attachment: Option<&'a Attachment>,
}

impl AttachmentBar<'_> {
    fn line(&self) -> Line<'static> {
        match self.attachment {
            Some(attachment) => Line::from(vec![
                Span::styled(
                    format!(" 📎 {}", attachment.file_name),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" · {} · {}", attachment.mime, attachment.size_label())),
                Span::styled("  (/detach to remove)", Style::default().add_modifier(Modifier::DIM)),
            ]),
            None => Line::styled(
                " No image attached (/attach <path>)",
                Style::default().add_modifier(Modifier::DIM),
            ),
        }
    }
}

impl Component for AttachmentBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

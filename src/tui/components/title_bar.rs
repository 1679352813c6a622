//! # TitleBar Component
//!
//! Top status bar: backend endpoint, model, and the session's status
//! message. While a turn is in flight the status is prefixed with a spinner.
//!
//! Stateless: all fields are props supplied by the parent each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;

const SPINNER: &[&str] = &["◐", "◓", "◑", "◒"];

pub struct TitleBar {
    pub endpoint: String,
    /// None = the backend's default model.
    pub model: Option<String>,
    pub status_message: String,
    /// Some(frame) while a turn is in flight.
    pub spinner_frame: Option<usize>,
}

impl TitleBar {
    fn text(&self) -> String {
        let model = self.model.as_deref().unwrap_or("default");
        let status = match self.spinner_frame {
            Some(frame) => format!("{} {}", SPINNER[frame % SPINNER.len()], self.status_message),
            None => self.status_message.clone(),
        };
        if status.is_empty() {
            format!("Glimpse ({} · model: {})", self.endpoint, model)
        } else {
            format!("Glimpse ({} · model: {}) | {}", self.endpoint, model, status)
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}

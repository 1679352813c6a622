use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{AttachmentBar, MessageList, TitleBar};

/// Draws one frame. Reads `App`, never mutates it.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1), Length(3)]);
    let [title_area, main_area, attachment_area, input_area] = layout.areas(frame.area());

    TitleBar {
        endpoint: app.config.endpoint.clone(),
        model: app.config.model.clone(),
        status_message: app.status_message.clone(),
        spinner_frame: app.is_submitting().then_some(spinner_frame),
    }
    .render(frame, title_area);

    MessageList {
        messages: app.log.messages(),
        receiving: app.log.is_receiving(),
        spinner_frame,
        state: &mut tui.message_list,
    }
    .render(frame, main_area);

    AttachmentBar {
        attachment: app.pending.as_ref(),
    }
    .render(frame, attachment_area);

    tui.input_box.dimmed = app.is_submitting();
    tui.input_box.render(frame, input_area);
}

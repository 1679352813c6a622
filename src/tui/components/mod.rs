//! # TUI Components
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: endpoint, model and session status
//! - `AttachmentBar`: pending image preview
//!
//! ## Stateful Components (Event-Driven)
//!
//! - `InputBox`: prompt editor
//! - `MessageList`: scrollable conversation view (`MessageListState` persists
//!   across frames)
//!
//! Components receive external data as props, never by reading `App`
//! directly, so each one can be rendered against a `TestBackend` in isolation.

pub mod attachment_bar;
pub mod input_box;
pub mod message_list;
pub mod title_bar;

pub use attachment_bar::AttachmentBar;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;

//! Turns a submitted input line into a core `Action`.
//!
//! Lines starting with a known slash command are user intents other than
//! sending a message; everything else is a submission.

use std::path::PathBuf;

use crate::core::action::Action;

pub const HELP: &str = "/attach <path> · /detach · /quit";

pub fn parse(line: &str) -> Action {
    let trimmed = line.trim();
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        "/attach" if rest.is_empty() => {
            Action::AttachmentFailed("usage: /attach <path>".to_string())
        }
        "/attach" => Action::PickImage(expand_home(rest)),
        "/detach" => Action::ClearAttachment,
        "/quit" | "/exit" => Action::Quit,
        _ => Action::Submit(line.to_string()),
    }
}

/// Expands a leading `~/` to the home directory and strips surrounding quotes
/// (terminals often quote dragged-in paths).
fn expand_home(raw: &str) -> PathBuf {
    let unquoted = raw
        .strip_prefix(['"', '\''])
        .and_then(|s| s.strip_suffix(['"', '\'']))
        .unwrap_or(raw);

    if let Some(rest) = unquoted.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(unquoted)
}

//! Response parsing
//!
//! Splits one raw model reply into the parts the discussion cares about.
//!
//! | Part | Source |
//! |------|--------|
//! | spoken text | everything before a trailing notepad block, minus stop tags |
//! | notepad | text inside a `<notepad_update>` block that ends the reply |
//! | stop vote | any `<discussion_complete />` tag in the spoken part |
//!
//! A notepad block only counts when its closing tag is the literal end of
//! the (trimmed) reply. Anything else (missing close, trailing text) is
//! treated as ordinary prose and stays in the spoken text.

use crate::prompt::{DISCUSSION_COMPLETE_TAG, NOTEPAD_UPDATE_TAG_END, NOTEPAD_UPDATE_TAG_START};
use serde::{Deserialize, Serialize};

/// The parts of one model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResponse {
    /// Text to show and to append to the transcript; never empty
    pub spoken_text: String,
    /// Full replacement for the notepad, when the reply carried a valid block.
    /// `Some("")` means the block was present but empty.
    pub new_notepad_content: Option<String>,
    /// The reply voted to end the discussion
    pub discussion_should_end: bool,
}

/// Parse a raw model reply.
pub fn parse_response(raw: &str) -> ParsedResponse {
    let text = raw.trim();

    let (mut spoken, new_notepad_content) = match extract_notepad_block(text) {
        Some((before, notepad)) => (before.trim().to_string(), Some(notepad.trim().to_string())),
        None => (text.to_string(), None),
    };

    let discussion_should_end = spoken.contains(DISCUSSION_COMPLETE_TAG);
    if discussion_should_end {
        spoken = spoken.replace(DISCUSSION_COMPLETE_TAG, "").trim().to_string();
    }

    if spoken.trim().is_empty() {
        spoken = placeholder(new_notepad_content.as_deref(), discussion_should_end);
    }

    ParsedResponse {
        spoken_text: spoken.trim().to_string(),
        new_notepad_content,
        discussion_should_end,
    }
}

/// Returns `(text before the block, block content)` for a well-formed
/// trailing block.
fn extract_notepad_block(text: &str) -> Option<(&str, &str)> {
    let start = text.rfind(NOTEPAD_UPDATE_TAG_START)?;
    let end = text.rfind(NOTEPAD_UPDATE_TAG_END)?;
    if end <= start || !text.ends_with(NOTEPAD_UPDATE_TAG_END) {
        return None;
    }
    let content_start = start + NOTEPAD_UPDATE_TAG_START.len();
    if content_start > end {
        return None;
    }
    Some((&text[..start], &text[content_start..end]))
}

/// Describes what the role did when it said nothing else.
fn placeholder(notepad: Option<&str>, suggested_end: bool) -> String {
    let notepad_action = notepad.map(|content| {
        if content.is_empty() {
            "attempted to update the notepad but the content was empty"
        } else {
            "updated the notepad"
        }
    });
    let end_action = suggested_end.then_some("suggested ending the discussion");

    match (notepad_action, end_action) {
        (Some(n), Some(e)) => format!("(AI {} and {})", n, e),
        (Some(n), None) => format!("(AI {})", n),
        (None, Some(e)) => format!("(AI {})", e),
        (None, None) => "(AI did not provide an additional text reply)".to_string(),
    }
}

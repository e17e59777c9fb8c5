//! Prompt domain
//!
//! Fixed instruction blocks and the templates that assemble the text sent
//! to a role at each position of a discussion.

mod instructions;
mod template;

pub use instructions::{
    AI_DRIVEN_DISCUSSION_INSTRUCTION, DISCUSSION_COMPLETE_TAG, INITIAL_NOTEPAD_CONTENT,
    NOTEPAD_UPDATE_TAG_END, NOTEPAD_UPDATE_TAG_START, notepad_instructions,
};
pub use template::PromptTemplate;

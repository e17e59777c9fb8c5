//! Interactive chat module
//!
//! Provides a reedline-based interactive chat interface where every line is
//! a new question for the same session notepad.

mod command;
mod repl;

pub use command::{ReplCommand, parse_command};
pub use repl::ChatRepl;

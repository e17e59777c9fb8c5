//! Discussion domain
//!
//! The turn-taking state machine and everything it produces:
//!
//! - [`state::DiscussionState`] — role order, round counter, transcript, stop votes
//! - [`parsing`] — splitting a raw reply into spoken text, notepad and stop vote
//! - [`notice::Notice`] — system notifications surfaced to the display layer
//! - [`record::DiscussionRecord`] / [`stats::DiscussionStats`] — what a finished
//!   discussion leaves behind
//! - [`transcript`] / [`welcome`] — plain-text renderings

pub mod mode;
pub mod notice;
pub mod parsing;
pub mod record;
pub mod state;
pub mod stats;
pub mod transcript;
pub mod welcome;

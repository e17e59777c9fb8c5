//! Domain layer for multimind
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Roles, Models and Channels
//!
//! A [`Role`] is a persona bound to a [`Model`], which in turn is reached
//! through a [`Channel`] (endpoint + credential). At discussion start the
//! three are joined into [`ActiveRole`]s.
//!
//! ## Discussion
//!
//! A [`DiscussionState`] drives turn-taking:
//!
//! - **Round zero**: every active role gives an initial opinion, in order
//! - **Discussion round**: roles respond to each other, bounded by the turn
//!   limit and (in AI-driven mode) by stop votes
//! - **Synthesis**: the first role produces the final answer
//!
//! ## Notepad
//!
//! A shared scratchpad threaded through every prompt. Any role may replace
//! it wholesale by ending its reply with a `<notepad_update>` block.

pub mod config;
pub mod core;
pub mod discussion;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use config::{
    ActiveRole, Channel, ChannelId, ConfigSnapshot, DEFAULT_CHANNEL_TIMEOUT_MS, DanglingReference,
    Model, ModelId, OutputFormat, Role, RoleId, RoleResolution,
};
pub use core::{error::DomainError, question::Question};
pub use discussion::{
    mode::{DiscussionMode, DiscussionSettings},
    notice::Notice,
    parsing::{ParsedResponse, parse_response},
    record::{
        DiscussionRecord, FinalAnswer, ImageMeta, MessagePurpose, NotepadUpdate, RoleSummary,
        TurnRecord,
    },
    state::{DiscussionState, ImageAttachment, NextStep, StopVote},
    stats::{DiscussionStats, RoleParticipation},
    transcript::render_transcript,
    welcome::welcome_message,
};
pub use prompt::{INITIAL_NOTEPAD_CONTENT, PromptTemplate};
pub use session::stream::StreamEvent;

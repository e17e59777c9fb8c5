//! Discussion progress port
//!
//! Defines the interface through which a running discussion reports to the
//! display layer: one message per role turn (started → deltas → exactly one
//! terminal update) plus discrete system notices.

use multimind_domain::Notice;
use serde::{Deserialize, Serialize};

/// Identifies one role message within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Which kind of turn a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// A regular reply in round `turn`
    Discussion { turn: u32 },
    /// The final synthesized answer
    Synthesis,
}

/// Callback for discussion progress.
///
/// Implementations live in the presentation layer and can display progress
/// in various ways (console, spinner, web UI, etc.)
pub trait DiscussionObserver: Send + Sync {
    /// A system notice (role thinking, round start, stop votes, errors...)
    fn on_notice(&self, notice: &Notice);

    /// A role message was opened; its text is empty until deltas arrive.
    fn on_turn_started(&self, _id: MessageId, _role_name: &str, _kind: TurnKind) {}

    /// Accumulated text so far for an open message.
    fn on_turn_delta(&self, _id: MessageId, _accumulated: &str) {}

    /// The message finished with its authoritative text.
    fn on_turn_completed(&self, _id: MessageId, _text: &str, _duration_ms: u64) {}

    /// The message ended without a usable reply; `text` explains why.
    fn on_turn_failed(&self, _id: MessageId, _text: &str) {}

    /// The shared notepad was replaced.
    fn on_notepad_changed(&self, _content: &str, _updated_by: &str) {}
}

/// No-op observer for when progress reporting is not needed
pub struct NoProgress;

impl DiscussionObserver for NoProgress {
    fn on_notice(&self, _notice: &Notice) {}
}

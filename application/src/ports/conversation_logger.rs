//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording discussion events
//! (prompts sent to roles, replies, notepad replacements, stop votes) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the full discussion
//! in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured discussion event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "role_prompt", "role_reply", "stop_vote").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging discussion events to a structured log.
///
/// `log` is synchronous and infallible: a failing log sink must never
/// interrupt a discussion.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

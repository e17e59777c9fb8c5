//! Streaming events for a single model invocation.
//!
//! [`StreamEvent`] carries model output as it is generated so the display
//! layer can render a reply before the invocation resolves.

/// An event in a streaming model response.
///
/// Every `Delta` carries the full text accumulated so far, so a consumer
/// that only keeps the latest `accumulated` value always shows a consistent
/// prefix of the final reply.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A newly received chunk plus everything received before it.
    Delta { chunk: String, accumulated: String },
    /// The stream ended normally; holds the complete text.
    Completed(String),
}

impl StreamEvent {
    /// The accumulated text carried by this event.
    pub fn text(&self) -> &str {
        match self {
            StreamEvent::Delta { accumulated, .. } => accumulated,
            StreamEvent::Completed(text) => text,
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_))
    }
}

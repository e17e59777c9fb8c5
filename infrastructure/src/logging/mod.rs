//! Logging infrastructure: structured discussion logging.
//!
//! Provides [`JsonlDiscussionLogger`], a JSONL file writer that implements
//! the [`ConversationLogger`](multimind_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlDiscussionLogger;

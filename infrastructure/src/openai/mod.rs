//! OpenAI-compatible chat-completions adapter
//!
//! Implements the [`ModelInvoker`](multimind_application::ModelInvoker) port
//! by POSTing to `{base_url}/chat/completions` with `stream: true` and
//! reading the server-sent events.

pub mod error;
pub mod invoker;
pub mod types;

pub use error::OpenAiError;
pub use invoker::OpenAiInvoker;

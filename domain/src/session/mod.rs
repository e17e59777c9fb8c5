//! Model session domain.
//!
//! - [`stream::StreamEvent`] — incremental output of one model invocation
pub mod stream;

//! Infrastructure layer for multimind
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the chat-completions invoker, configuration file
//! loading, the JSONL discussion log, image loading and exports.

pub mod config;
pub mod export;
pub mod image;
pub mod logging;
pub mod openai;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileConfigProvider, FileOutputConfig,
    FileOutputFormat, FileReplConfig,
};
pub use export::{DiscussionExporter, ExportError};
pub use image::{ImageLoadError, load_image};
pub use logging::JsonlDiscussionLogger;
pub use openai::{OpenAiError, OpenAiInvoker};

//! Application layer for multimind
//!
//! This crate contains the discussion engine, the session controller, and the
//! ports adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    config_provider::{ConfigSnapshotProvider, StaticConfig},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    exporter::{ExportKind, RecordExporter},
    model_invoker::{InvocationError, InvokeOutcome, InvokeRequest, ModelInvoker, category},
    progress::{DiscussionObserver, MessageId, NoProgress, TurnKind},
};
pub use use_cases::run_discussion::{
    DiscussionOutcome, DiscussionRun, RunDiscussionInput, RunDiscussionUseCase, TurnAbort,
};
pub use use_cases::start_discussion::{
    DiscussionReport, StartDiscussionError, StartDiscussionInput, StartDiscussionUseCase,
    validate_configuration,
};

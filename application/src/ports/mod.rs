//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod config_provider;
pub mod conversation_logger;
pub mod exporter;
pub mod model_invoker;
pub mod progress;

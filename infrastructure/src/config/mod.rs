//! Configuration file loading for multimind
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MULTIMIND_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./multimind.toml`
//! 4. Global: `$XDG_CONFIG_HOME/multimind/config.toml`
//! 5. Built-in defaults (one OpenAI channel, one model, Cognito and Muse)

mod file_config;
mod loader;
mod provider;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_KEY_ENV, FileChannelConfig, FileConfig,
    FileDiscussionConfig, FileLoggingConfig, FileModelConfig, FileOutputConfig, FileOutputFormat,
    FileReplConfig, FileRoleConfig, validate_channel, validate_model,
};
pub use loader::{ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILE};
pub use provider::FileConfigProvider;

//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain entities with
//! [`FileConfig::snapshot`] and [`FileConfig::discussion_settings`].

use multimind_domain::{
    Channel, ConfigSnapshot, DEFAULT_CHANNEL_TIMEOUT_MS, DiscussionMode, DiscussionSettings, Model,
    OutputFormat, Role,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export OutputFormat from domain for convenience
pub use multimind_domain::OutputFormat as FileOutputFormat;

/// Environment variable the built-in channel reads its key from.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Minimum accepted channel timeout.
pub const MIN_CHANNEL_TIMEOUT_MS: u64 = 1000;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("channel '{0}': name cannot be empty")]
    EmptyChannelName(String),

    #[error("channel '{id}': base_url '{url}' is not a valid URL")]
    InvalidBaseUrl { id: String, url: String },

    #[error("channel '{0}': API key is not set")]
    MissingApiKey(String),

    #[error("channel '{id}': timeout_ms must be at least 1000 (got {timeout_ms})")]
    TimeoutTooShort { id: String, timeout_ms: u64 },

    #[error("model '{id}': {field} cannot be empty")]
    EmptyModelField { id: String, field: &'static str },

    #[error("model '{0}': max_tokens must be at least 1")]
    InvalidMaxTokens(String),

    #[error("model '{id}': temperature must be between 0 and 2 (got {temperature})")]
    InvalidTemperature { id: String, temperature: f32 },

    #[error("role '{0}': name cannot be empty")]
    EmptyRoleName(String),
}

impl ConfigValidationError {
    /// Errors that only matter once a discussion starts.
    pub fn is_deferred(&self) -> bool {
        matches!(self, ConfigValidationError::MissingApiKey(_))
    }
}

/// Validate a resolved channel.
pub fn validate_channel(channel: &Channel) -> Result<(), ConfigValidationError> {
    let id = channel.id.to_string();
    if channel.name.trim().is_empty() {
        return Err(ConfigValidationError::EmptyChannelName(id));
    }
    if reqwest::Url::parse(&channel.base_url).is_err() {
        return Err(ConfigValidationError::InvalidBaseUrl {
            id,
            url: channel.base_url.clone(),
        });
    }
    if channel.timeout_ms < MIN_CHANNEL_TIMEOUT_MS {
        return Err(ConfigValidationError::TimeoutTooShort {
            id,
            timeout_ms: channel.timeout_ms,
        });
    }
    if !channel.has_api_key() {
        return Err(ConfigValidationError::MissingApiKey(id));
    }
    Ok(())
}

/// Validate a model profile.
pub fn validate_model(model: &Model) -> Result<(), ConfigValidationError> {
    let id = model.id.to_string();
    for (field, value) in [
        ("name", model.name.as_str()),
        ("api_name", model.api_name.as_str()),
        ("channel", model.channel_id.as_str()),
        ("category", model.category.as_str()),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelField { id, field });
        }
    }
    if model.max_tokens < 1 {
        return Err(ConfigValidationError::InvalidMaxTokens(id));
    }
    if !(0.0..=2.0).contains(&model.temperature) {
        return Err(ConfigValidationError::InvalidTemperature {
            id,
            temperature: model.temperature,
        });
    }
    Ok(())
}

/// Raw channel entry (`[[channels]]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChannelConfig {
    pub id: String,
    pub name: String,
    pub base_url: String,
    /// Literal API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    pub timeout_ms: u64,
    pub is_default: bool,
}

impl Default for FileChannelConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            base_url: String::new(),
            api_key: None,
            api_key_env: None,
            timeout_ms: DEFAULT_CHANNEL_TIMEOUT_MS,
            is_default: false,
        }
    }
}

impl FileChannelConfig {
    /// Resolve into a domain channel, reading the key from the environment
    /// when no literal key is configured.
    pub fn to_channel(&self) -> Channel {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.api_key_env
                    .as_deref()
                    .and_then(|var| std::env::var(var).ok())
            })
            .unwrap_or_default();

        let mut channel = Channel::new(self.id.as_str(), self.name.as_str(), self.base_url.as_str())
            .with_api_key(api_key)
            .with_timeout_ms(self.timeout_ms);
        channel.is_default = self.is_default;
        channel
    }
}

/// Raw model entry (`[[models]]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub id: String,
    pub name: String,
    pub api_name: String,
    pub channel: String,
    pub supports_images: bool,
    pub supports_reduced_capacity: bool,
    pub category: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            api_name: String::new(),
            channel: String::new(),
            supports_images: false,
            supports_reduced_capacity: false,
            category: "General".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

impl FileModelConfig {
    pub fn to_model(&self) -> Model {
        Model::new(
            self.id.as_str(),
            self.name.as_str(),
            self.api_name.as_str(),
            self.channel.as_str(),
        )
        .with_images(self.supports_images)
        .with_reduced_capacity(self.supports_reduced_capacity)
        .with_category(self.category.as_str())
        .with_limits(self.max_tokens, self.temperature)
    }
}

/// Raw role entry (`[[roles]]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoleConfig {
    pub id: String,
    pub name: String,
    pub system_prompt: String,
    pub model: String,
    pub active: bool,
}

impl Default for FileRoleConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            system_prompt: String::new(),
            model: String::new(),
            active: true,
        }
    }
}

impl FileRoleConfig {
    pub fn to_role(&self) -> Role {
        let role = Role::new(self.id.as_str(), self.name.as_str(), self.model.as_str())
            .with_system_prompt(self.system_prompt.as_str());
        if self.active { role } else { role.inactive() }
    }
}

/// Raw discussion configuration (`[discussion]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    pub mode: DiscussionMode,
    /// Clamped into the allowed range when read
    pub fixed_turns: i64,
    pub reduced_capacity: bool,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        let settings = DiscussionSettings::default();
        Self {
            mode: settings.mode,
            fixed_turns: i64::from(settings.fixed_turns()),
            reduced_capacity: settings.reduced_capacity,
        }
    }
}

/// Raw output configuration (`[output]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Directory for exported transcripts and records
    pub export_dir: Option<String>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            export_dir: None,
        }
    }
}

/// Raw REPL configuration (`[repl]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Raw logging configuration (`[logging]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the rolling tracing log
    pub dir: Option<String>,
    /// Write a JSONL discussion log next to the tracing log
    pub conversation_log: bool,
}

/// Complete file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub discussion: FileDiscussionConfig,
    pub output: FileOutputConfig,
    pub repl: FileReplConfig,
    pub logging: FileLoggingConfig,
    pub channels: Vec<FileChannelConfig>,
    pub models: Vec<FileModelConfig>,
    pub roles: Vec<FileRoleConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        let builtin = ConfigSnapshot::builtin();
        Self {
            discussion: FileDiscussionConfig::default(),
            output: FileOutputConfig::default(),
            repl: FileReplConfig::default(),
            logging: FileLoggingConfig::default(),
            channels: builtin
                .channels
                .iter()
                .map(|c| FileChannelConfig {
                    id: c.id.to_string(),
                    name: c.name.clone(),
                    base_url: c.base_url.clone(),
                    api_key: None,
                    api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
                    timeout_ms: c.timeout_ms,
                    is_default: c.is_default,
                })
                .collect(),
            models: builtin
                .models
                .iter()
                .map(|m| FileModelConfig {
                    id: m.id.to_string(),
                    name: m.name.clone(),
                    api_name: m.api_name.clone(),
                    channel: m.channel_id.to_string(),
                    supports_images: m.supports_images,
                    supports_reduced_capacity: m.supports_reduced_capacity,
                    category: m.category.clone(),
                    max_tokens: m.max_tokens,
                    temperature: m.temperature,
                })
                .collect(),
            roles: builtin
                .roles
                .iter()
                .map(|r| FileRoleConfig {
                    id: r.id.to_string(),
                    name: r.name.clone(),
                    system_prompt: r.system_prompt.clone(),
                    model: r.model_id.to_string(),
                    active: r.is_active,
                })
                .collect(),
        }
    }
}

impl FileConfig {
    /// Domain snapshot of channels, models and roles. API keys held in
    /// environment variables are read at this point.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(
            self.channels.iter().map(FileChannelConfig::to_channel).collect(),
            self.models.iter().map(FileModelConfig::to_model).collect(),
            self.roles.iter().map(FileRoleConfig::to_role).collect(),
        )
    }

    pub fn discussion_settings(&self) -> DiscussionSettings {
        DiscussionSettings::new(self.discussion.mode)
            .with_fixed_turns(self.discussion.fixed_turns)
            .with_reduced_capacity(self.discussion.reduced_capacity)
    }

    /// Validate the configuration.
    ///
    /// Returns the deferred problems (missing API keys) so the caller can
    /// warn about them; those are reported again when a discussion starts.
    pub fn validate(&self) -> Result<Vec<ConfigValidationError>, ConfigValidationError> {
        let snapshot = self.snapshot();
        let mut deferred = Vec::new();

        for channel in &snapshot.channels {
            match validate_channel(channel) {
                Ok(()) => {}
                Err(e) if e.is_deferred() => deferred.push(e),
                Err(e) => return Err(e),
            }
        }
        for model in &snapshot.models {
            validate_model(model)?;
        }
        for role in &snapshot.roles {
            if role.name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyRoleName(role.id.to_string()));
            }
        }

        Ok(deferred)
    }
}

//! API channel entity

use super::ids::ChannelId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request timeout applied when a channel does not configure one.
pub const DEFAULT_CHANNEL_TIMEOUT_MS: u64 = 30_000;

/// A network endpoint plus credential used to reach a model provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub is_default: bool,
}

impl Channel {
    pub fn new(id: impl Into<ChannelId>, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_url: base_url.into(),
            api_key: String::new(),
            timeout_ms: DEFAULT_CHANNEL_TIMEOUT_MS,
            is_default: false,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Whether a non-blank key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_channel_defaults() {
        let ch = Channel::new("c1", "Local", "http://localhost:8080/v1");
        assert_eq!(ch.timeout_ms, DEFAULT_CHANNEL_TIMEOUT_MS);
        assert!(!ch.is_default);
        assert!(!ch.has_api_key());
    }

    #[test]
    fn test_blank_key_is_missing() {
        let ch = Channel::new("c1", "Local", "http://x").with_api_key("   ");
        assert!(!ch.has_api_key());
        assert!(ch.with_api_key("sk-1").has_api_key());
    }
}

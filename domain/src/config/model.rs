//! Model entity

use super::ids::{ChannelId, ModelId};
use serde::{Deserialize, Serialize};

/// A model reachable through a channel, with its capability flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,
    /// Display name
    pub name: String,
    /// Name sent to the API (`model` field of the request)
    pub api_name: String,
    pub channel_id: ChannelId,
    pub supports_images: bool,
    pub supports_reduced_capacity: bool,
    pub category: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Model {
    pub fn new(
        id: impl Into<ModelId>,
        name: impl Into<String>,
        api_name: impl Into<String>,
        channel_id: impl Into<ChannelId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            api_name: api_name.into(),
            channel_id: channel_id.into(),
            supports_images: false,
            supports_reduced_capacity: false,
            category: "General".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }

    pub fn with_images(mut self, supported: bool) -> Self {
        self.supports_images = supported;
        self
    }

    pub fn with_reduced_capacity(mut self, supported: bool) -> Self {
        self.supports_reduced_capacity = supported;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

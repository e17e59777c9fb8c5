//! Role entity and its resolved, discussion-ready form

use super::channel::Channel;
use super::ids::{ModelId, RoleId};
use super::model::Model;
use serde::{Deserialize, Serialize};

/// A named persona bound to a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub system_prompt: String,
    pub model_id: ModelId,
    pub is_active: bool,
}

impl Role {
    pub fn new(id: impl Into<RoleId>, name: impl Into<String>, model_id: impl Into<ModelId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            system_prompt: String::new(),
            model_id: model_id.into(),
            is_active: true,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A role joined with its model and channel at discussion start.
///
/// Only constructed by [`ConfigSnapshot::resolve_active_roles`](super::ConfigSnapshot::resolve_active_roles),
/// so every `ActiveRole` has valid references.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRole {
    pub role: Role,
    pub model: Model,
    pub channel: Channel,
}

impl ActiveRole {
    pub fn id(&self) -> &RoleId {
        &self.role.id
    }

    pub fn name(&self) -> &str {
        &self.role.name
    }

    pub fn system_prompt(&self) -> Option<&str> {
        let prompt = self.role.system_prompt.as_str();
        (!prompt.trim().is_empty()).then_some(prompt)
    }

    pub fn supports_images(&self) -> bool {
        self.model.supports_images
    }

    /// Reduced capacity applies only when both the global toggle is on and
    /// the model supports it.
    pub fn use_reduced_capacity(&self, globally_enabled: bool) -> bool {
        globally_enabled && self.model.supports_reduced_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(reduced: bool) -> ActiveRole {
        ActiveRole {
            role: Role::new("r1", "Cognito", "m1"),
            model: Model::new("m1", "Mini", "gpt-4.1-mini", "c1").with_reduced_capacity(reduced),
            channel: Channel::new("c1", "Official", "https://api.openai.com/v1"),
        }
    }

    #[test]
    fn test_reduced_capacity_requires_both_flags() {
        assert!(active(true).use_reduced_capacity(true));
        assert!(!active(true).use_reduced_capacity(false));
        assert!(!active(false).use_reduced_capacity(true));
    }

    #[test]
    fn test_blank_system_prompt_is_none() {
        let mut role = active(false);
        assert_eq!(role.system_prompt(), None);
        role.role.system_prompt = "You are Cognito.".to_string();
        assert_eq!(role.system_prompt(), Some("You are Cognito."));
    }
}

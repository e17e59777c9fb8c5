//! Immutable configuration snapshot and the Role → Model → Channel join.

use super::channel::Channel;
use super::ids::{ChannelId, ModelId, RoleId};
use super::model::Model;
use super::role::{ActiveRole, Role};
use serde::{Deserialize, Serialize};

/// Everything a discussion needs from configuration, captured once at start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub channels: Vec<Channel>,
    pub models: Vec<Model>,
    pub roles: Vec<Role>,
}

/// A role excluded from the active set because a reference did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    MissingModel { role: RoleId, model: ModelId },
    MissingChannel { role: RoleId, model: ModelId, channel: ChannelId },
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingModel { role, model } => {
                write!(f, "role '{}' references unknown model '{}'", role, model)
            }
            Self::MissingChannel {
                role,
                model,
                channel,
            } => write!(
                f,
                "role '{}' uses model '{}' with unknown channel '{}'",
                role, model, channel
            ),
        }
    }
}

/// Result of joining active roles with their models and channels.
#[derive(Debug, Clone, Default)]
pub struct RoleResolution {
    /// Fully resolved roles, in configuration order
    pub active: Vec<ActiveRole>,
    /// Active roles dropped because of a dangling reference
    pub dangling: Vec<DanglingReference>,
}

impl ConfigSnapshot {
    pub fn new(channels: Vec<Channel>, models: Vec<Model>, roles: Vec<Role>) -> Self {
        Self {
            channels,
            models,
            roles,
        }
    }

    pub fn channel(&self, id: &ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|c| &c.id == id)
    }

    pub fn model(&self, id: &ModelId) -> Option<&Model> {
        self.models.iter().find(|m| &m.id == id)
    }

    /// Join every active role with its model and channel.
    ///
    /// Order follows `roles`; inactive roles are skipped silently and roles
    /// with an unresolvable reference are reported in
    /// [`RoleResolution::dangling`].
    pub fn resolve_active_roles(&self) -> RoleResolution {
        let mut resolution = RoleResolution::default();

        for role in self.roles.iter().filter(|r| r.is_active) {
            let Some(model) = self.model(&role.model_id) else {
                resolution.dangling.push(DanglingReference::MissingModel {
                    role: role.id.clone(),
                    model: role.model_id.clone(),
                });
                continue;
            };
            let Some(channel) = self.channel(&model.channel_id) else {
                resolution.dangling.push(DanglingReference::MissingChannel {
                    role: role.id.clone(),
                    model: model.id.clone(),
                    channel: model.channel_id.clone(),
                });
                continue;
            };
            resolution.active.push(ActiveRole {
                role: role.clone(),
                model: model.clone(),
                channel: channel.clone(),
            });
        }

        resolution
    }
}

//! Configuration snapshot port
//!
//! The session controller reads configuration exactly once per discussion
//! through this port. Nothing queries live configuration mid-discussion.

use multimind_domain::{ConfigSnapshot, DiscussionSettings};

/// Supplies immutable snapshots of channels, models and roles.
pub trait ConfigSnapshotProvider: Send + Sync {
    /// Current channels, models and roles.
    fn snapshot(&self) -> ConfigSnapshot;

    /// Discussion settings (mode, fixed turns, reduced capacity).
    fn discussion_settings(&self) -> DiscussionSettings;
}

/// A provider that always returns the same configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    snapshot: ConfigSnapshot,
    settings: DiscussionSettings,
}

impl StaticConfig {
    pub fn new(snapshot: ConfigSnapshot, settings: DiscussionSettings) -> Self {
        Self { snapshot, settings }
    }
}

impl ConfigSnapshotProvider for StaticConfig {
    fn snapshot(&self) -> ConfigSnapshot {
        self.snapshot.clone()
    }

    fn discussion_settings(&self) -> DiscussionSettings {
        self.settings
    }
}

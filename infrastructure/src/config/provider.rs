//! [`ConfigSnapshotProvider`] backed by the loaded file configuration

use super::file_config::FileConfig;
use multimind_application::ConfigSnapshotProvider;
use multimind_domain::{ConfigSnapshot, DiscussionSettings};

/// Serves snapshots built from a [`FileConfig`].
///
/// Keys configured through `api_key_env` are re-read on every snapshot, so
/// exporting a key between discussions takes effect without a restart.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    config: FileConfig,
}

impl FileConfigProvider {
    pub fn new(config: FileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }
}

impl ConfigSnapshotProvider for FileConfigProvider {
    fn snapshot(&self) -> ConfigSnapshot {
        self.config.snapshot()
    }

    fn discussion_settings(&self) -> DiscussionSettings {
        self.config.discussion_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multimind_domain::DiscussionMode;

    #[test]
    fn test_provider_serves_file_config() {
        let config: FileConfig = toml::from_str(
            r#"
[discussion]
mode = "ai-driven"

[[channels]]
id = "c1"
name = "Primary"
base_url = "https://example.com/v1"
api_key = "sk-file"
"#,
        )
        .unwrap();
        let provider = FileConfigProvider::new(config);

        assert_eq!(provider.discussion_settings().mode, DiscussionMode::AiDriven);
        let snapshot = provider.snapshot();
        assert_eq!(snapshot.channels.len(), 1);
        assert_eq!(snapshot.channels[0].api_key, "sk-file");
    }
}

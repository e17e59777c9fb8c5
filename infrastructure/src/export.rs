//! Writing discussion transcripts and records to disk

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use multimind_application::{ExportKind, RecordExporter};
use multimind_domain::{DiscussionRecord, render_transcript};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize discussion record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes exports into one directory with timestamped file names.
#[derive(Debug, Clone)]
pub struct DiscussionExporter {
    dir: PathBuf,
}

impl DiscussionExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `multimind-chat-2024-05-01-142233.txt` style file name.
    pub fn file_name(kind: ExportKind, at: DateTime<Utc>) -> String {
        format!("multimind-chat-{}.{}", at.format("%Y-%m-%d-%H%M%S"), kind.extension())
    }

    /// Write `record` in the requested format and return the file path.
    pub async fn write(&self, record: &DiscussionRecord, kind: ExportKind) -> Result<PathBuf, ExportError> {
        let now = Utc::now();
        let contents = match kind {
            ExportKind::Transcript => render_transcript(record, now),
            ExportKind::Record => serde_json::to_string_pretty(record)?,
        };

        let path = self.dir.join(Self::file_name(kind, now));
        let io_error = |source: std::io::Error| ExportError::Io {
            path: path.clone(),
            source,
        };
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_error)?;
        tokio::fs::write(&path, contents).await.map_err(io_error)?;

        info!("Exported discussion to {}", path.display());
        Ok(path)
    }
}

#[async_trait]
impl RecordExporter for DiscussionExporter {
    async fn export(
        &self,
        record: &DiscussionRecord,
        kind: ExportKind,
    ) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.write(record, kind).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use multimind_domain::{ActiveRole, Channel, DiscussionSettings, Model, Role};

    fn record() -> DiscussionRecord {
        let role = ActiveRole {
            role: Role::new("cognito", "Cognito", "m1"),
            model: Model::new("m1", "Mini", "gpt-4.1-mini", "c1"),
            channel: Channel::new("c1", "Official", "https://api.openai.com/v1"),
        };
        let mut record = DiscussionRecord::begin(
            "What is 2+2?",
            None,
            DiscussionSettings::default(),
            std::slice::from_ref(&role),
            "notes",
        );
        record.push_turn(&role, "Four.", 1500);
        record.set_final_answer(&role, "The answer is 4.", 700);
        record.finish(true, false, 2200);
        record
    }

    #[test]
    fn test_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 14, 22, 33).unwrap();
        assert_eq!(
            DiscussionExporter::file_name(ExportKind::Transcript, at),
            "multimind-chat-2024-05-01-142233.txt"
        );
        assert_eq!(
            DiscussionExporter::file_name(ExportKind::Record, at),
            "multimind-chat-2024-05-01-142233.json"
        );
    }

    #[tokio::test]
    async fn test_export_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DiscussionExporter::new(dir.path().join("exports"));

        let path = exporter.write(&record(), ExportKind::Transcript).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("=== Multi-Mind Chat Transcript ==="));
        assert!(text.contains("Cognito (1.50s): Four."));
    }

    #[tokio::test]
    async fn test_export_record_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DiscussionExporter::new(dir.path());
        let original = record();

        let path = exporter.write(&original, ExportKind::Record).await.unwrap();

        let parsed: DiscussionRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[tokio::test]
    async fn test_export_through_port() {
        let dir = tempfile::tempdir().unwrap();
        let exporter: Box<dyn RecordExporter> = Box::new(DiscussionExporter::new(dir.path()));

        let path = exporter.export(&record(), ExportKind::Transcript).await.unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("txt"));
    }
}

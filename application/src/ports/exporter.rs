//! Port for saving a finished discussion outside the process.

use async_trait::async_trait;
use multimind_domain::DiscussionRecord;
use std::path::PathBuf;

/// What to write when exporting a discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Human-readable transcript
    Transcript,
    /// Full [`DiscussionRecord`] as pretty JSON
    Record,
}

impl ExportKind {
    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Transcript => "txt",
            ExportKind::Record => "json",
        }
    }
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "txt" | "text" | "transcript" => Ok(ExportKind::Transcript),
            "json" | "record" => Ok(ExportKind::Record),
            other => Err(format!("unknown export format '{}' (expected txt or json)", other)),
        }
    }
}

/// Writes a discussion somewhere durable and reports where it went.
#[async_trait]
pub trait RecordExporter: Send + Sync {
    async fn export(
        &self,
        record: &DiscussionRecord,
        kind: ExportKind,
    ) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_kind() {
        assert_eq!("".parse::<ExportKind>(), Ok(ExportKind::Transcript));
        assert_eq!("JSON".parse::<ExportKind>(), Ok(ExportKind::Record));
        assert!("pdf".parse::<ExportKind>().is_err());
    }
}

//! CLI command definitions

use clap::{Parser, ValueEnum};
use multimind_application::ExportKind;
use multimind_domain::{DiscussionMode, DiscussionSettings};
use std::path::PathBuf;

/// Output format for a finished discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every role turn, the final answer and statistics
    Full,
    /// Only the final answer
    Final,
    /// Discussion record and statistics as JSON
    Json,
}

impl From<OutputFormat> for multimind_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Final => Self::Final,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// How the discussion length is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Run a fixed number of discussion rounds
    Fixed,
    /// Let the roles vote to end the discussion
    AiDriven,
}

impl From<ModeArg> for DiscussionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fixed => DiscussionMode::FixedTurns,
            ModeArg::AiDriven => DiscussionMode::AiDriven,
        }
    }
}

/// File format for `--export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Human-readable transcript
    Txt,
    /// Full discussion record
    Json,
}

impl From<ExportFormat> for ExportKind {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Txt => ExportKind::Transcript,
            ExportFormat::Json => ExportKind::Record,
        }
    }
}

/// CLI arguments for multimind
#[derive(Parser, Debug)]
#[command(name = "multimind")]
#[command(author, version, about = "Multi-Mind Chat - several AI roles discuss your question and agree on an answer")]
#[command(long_about = r#"
Multi-Mind Chat puts your question in front of several AI roles that share a
notepad and talk it through.

Each discussion has three stages:
1. Round zero: every active role gives an initial view, in order
2. Discussion: roles respond to each other for a fixed number of rounds,
   or until most of them vote to stop (--mode ai-driven)
3. Synthesis: the first role writes the final answer

Configuration files are loaded from (in priority order):
1. MULTIMIND_* environment variables
2. --config <path>       Explicit config file
3. ./multimind.toml      Project-level config
4. ~/.config/multimind/config.toml   Global config

Example:
  multimind "Is a hot dog a sandwich?"
  multimind --mode ai-driven -o full "Design a caching strategy for a blog"
  multimind --image chart.png "What trend does this chart show?"
  multimind --chat
"#)]
pub struct Cli {
    /// The question to discuss (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Attach an image to the question (png, jpg, gif, webp, bmp)
    #[arg(short, long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Discussion mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Discussion rounds in fixed mode (clamped to 1..=5)
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub turns: Option<i64>,

    /// Ask for shorter replies with lower temperature
    #[arg(long)]
    pub reduced_capacity: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Export the finished discussion
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub export: Option<ExportFormat>,

    /// Directory for exported files (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Write operation and conversation logs to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Apply `--mode`, `--turns` and `--reduced-capacity` on top of configured settings.
    pub fn discussion_settings(&self, configured: DiscussionSettings) -> DiscussionSettings {
        let mut settings = configured;
        if let Some(mode) = self.mode {
            settings.mode = mode.into();
        }
        if let Some(turns) = self.turns {
            settings = settings.with_fixed_turns(turns);
        }
        if self.reduced_capacity {
            settings = settings.with_reduced_capacity(true);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_and_flags() {
        let cli = Cli::parse_from([
            "multimind",
            "--mode",
            "ai-driven",
            "-o",
            "full",
            "--export",
            "json",
            "What is 2+2?",
        ]);
        assert_eq!(cli.question.as_deref(), Some("What is 2+2?"));
        assert_eq!(cli.mode, Some(ModeArg::AiDriven));
        assert_eq!(cli.output, Some(OutputFormat::Full));
        assert_eq!(cli.export, Some(ExportFormat::Json));
        assert!(!cli.chat);
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["multimind", "-vv", "--chat"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.chat);
    }

    #[test]
    fn test_settings_override_clamps_turns() {
        let cli = Cli::parse_from(["multimind", "--turns", "9", "--reduced-capacity", "q"]);
        let settings = cli.discussion_settings(DiscussionSettings::default());
        assert_eq!(settings.mode, DiscussionMode::FixedTurns);
        assert_eq!(settings.fixed_turns(), 5);
        assert!(settings.reduced_capacity);

        let cli = Cli::parse_from(["multimind", "--turns", "-3", "q"]);
        assert_eq!(cli.discussion_settings(DiscussionSettings::default()).fixed_turns(), 1);
    }

    #[test]
    fn test_settings_untouched_without_flags() {
        let configured = DiscussionSettings::new(DiscussionMode::AiDriven).with_fixed_turns(4);
        let cli = Cli::parse_from(["multimind", "q"]);
        assert_eq!(cli.discussion_settings(configured), configured);
    }

    #[test]
    fn test_export_format_maps_to_kind() {
        assert_eq!(ExportKind::from(ExportFormat::Txt), ExportKind::Transcript);
        assert_eq!(ExportKind::from(ExportFormat::Json), ExportKind::Record);
    }
}

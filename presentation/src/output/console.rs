//! Console output formatter for discussion reports

use colored::Colorize;
use multimind_application::{DiscussionOutcome, DiscussionReport};
use multimind_domain::{INITIAL_NOTEPAD_CONTENT, OutputFormat};
use serde_json::json;

/// Formats discussion reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Dispatch on the configured output format
    pub fn format(report: &DiscussionReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_full(report),
            OutputFormat::Final => Self::format_final(report),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    /// Every turn, the final answer, the notepad and statistics
    pub fn format_full(report: &DiscussionReport) -> String {
        let record = &report.run.record;
        let mut output = String::new();

        output.push_str(&Self::header("Multi-Mind Discussion"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), record.user_query));
        if let Some(image) = &record.user_image {
            output.push_str(&format!(
                "{} {} ({}, {} bytes)\n",
                "Image:".cyan().bold(),
                image.name,
                image.mime_type,
                image.size_bytes
            ));
        }
        let roles: Vec<String> = record
            .active_roles
            .iter()
            .map(|r| format!("{} ({})", r.name, r.model_name))
            .collect();
        output.push_str(&format!("{} {}\n", "Roles:".cyan().bold(), roles.join(", ")));
        output.push_str(&format!("{} {}\n", "Mode:".cyan().bold(), record.settings.describe()));

        output.push_str(&Self::section_header("Discussion"));
        for turn in record.discussion_turns() {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ({}) ──", turn.role, Self::seconds(turn.duration_ms))
                    .yellow()
                    .bold(),
                turn.message
            ));
        }

        output.push_str(&Self::section_header("Final Answer"));
        match &record.final_answer {
            Some(answer) => output.push_str(&format!(
                "\n{}\n\n{}\n",
                format!("Synthesized by {} ({})", answer.provider, Self::seconds(answer.duration_ms))
                    .yellow()
                    .bold(),
                answer.content
            )),
            None => output.push_str(&format!("\n{}\n", Self::outcome_message(&report.run.outcome).red())),
        }

        let notepad = record.final_notepad.trim();
        if !notepad.is_empty() && notepad != INITIAL_NOTEPAD_CONTENT.trim() {
            output.push_str(&Self::section_header("Notepad"));
            output.push_str(&Self::indent(notepad, "  "));
            output.push('\n');
        }

        output.push_str(&Self::section_header("Statistics"));
        output.push_str(&Self::format_stats(report));

        output.push_str(&Self::footer());
        output
    }

    /// Only the final answer, or why there is none
    pub fn format_final(report: &DiscussionReport) -> String {
        match &report.run.record.final_answer {
            Some(answer) => format!(
                "{}\n\n{}\n",
                format!("=== Final answer ({}) ===", answer.provider).cyan().bold(),
                answer.content
            ),
            None => format!("{}\n", Self::outcome_message(&report.run.outcome).red()),
        }
    }

    /// Outcome, record and statistics as pretty JSON
    pub fn format_json(report: &DiscussionReport) -> String {
        let value = json!({
            "outcome": Self::outcome_label(&report.run.outcome),
            "message": match &report.run.outcome {
                DiscussionOutcome::Completed { .. } => None,
                other => Some(Self::outcome_message(other)),
            },
            "elapsed_ms": report.elapsed.as_millis() as u64,
            "record": report.run.record,
            "stats": report.stats,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Short machine-readable label for an outcome
    pub fn outcome_label(outcome: &DiscussionOutcome) -> &'static str {
        match outcome {
            DiscussionOutcome::Completed { .. } => "completed",
            DiscussionOutcome::Interrupted => "interrupted",
            DiscussionOutcome::AuthFailed { .. } => "auth_failed",
            DiscussionOutcome::Failed { .. } => "failed",
        }
    }

    /// One-line explanation of how a discussion ended
    pub fn outcome_message(outcome: &DiscussionOutcome) -> String {
        match outcome {
            DiscussionOutcome::Completed { .. } => "Discussion completed.".to_string(),
            DiscussionOutcome::Interrupted => {
                "Discussion interrupted before a final answer was produced.".to_string()
            }
            DiscussionOutcome::AuthFailed { role, channel } => format!(
                "Discussion stopped: the API key for channel {} was rejected while {} was speaking.",
                channel, role
            ),
            DiscussionOutcome::Failed { message } => {
                format!("Discussion stopped after an error: {}", message)
            }
        }
    }

    fn format_stats(report: &DiscussionReport) -> String {
        let stats = &report.stats;
        let mut output = String::new();
        output.push_str(&format!(
            "Replies: {}  (avg {}, longest {}, shortest {})\n",
            stats.total_turns,
            Self::seconds(stats.average_response_time_ms as u64),
            Self::seconds(stats.longest_response_time_ms),
            Self::seconds(stats.shortest_response_time_ms),
        ));
        for participation in stats.role_participation.values() {
            output.push_str(&format!(
                "  * {}: {} replies, avg {}\n",
                participation.role,
                participation.turn_count,
                Self::seconds(participation.average_response_time_ms as u64)
            ));
        }
        output.push_str(&format!(
            "Notepad updates per reply: {:.2}\n",
            stats.notepad_update_frequency
        ));
        output.push_str(&format!(
            "{} {:.2}s\n",
            "Elapsed:".dimmed(),
            report.elapsed.as_secs_f64()
        ));
        output
    }

    fn seconds(ms: u64) -> String {
        format!("{:.2}s", ms as f64 / 1000.0)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

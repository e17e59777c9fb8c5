//! Progress reporting for running discussions

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use multimind_application::{DiscussionObserver, MessageId, TurnKind};
use multimind_domain::Notice;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

const PREVIEW_WIDTH: usize = 60;

/// Reports progress with one spinner per open role message
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<MessageId, (String, ProgressBar)>>,
    show_replies: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            show_replies: false,
        }
    }

    /// Also print each completed reply (for full output and chat mode)
    pub fn with_replies(mut self, show: bool) -> Self {
        self.show_replies = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn println(&self, line: impl AsRef<str>) {
        // Fails only when the draw target is hidden; nothing useful to do then
        let _ = self.multi.println(line);
    }

    fn take_bar(&self, id: MessageId) -> Option<(String, ProgressBar)> {
        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscussionObserver for ProgressReporter {
    fn on_notice(&self, notice: &Notice) {
        match notice {
            // The spinner prefix already says who is speaking
            Notice::RoleThinking { .. } | Notice::Synthesizing { .. } => {}
            Notice::Error { .. } | Notice::Interrupted { .. } => {
                self.println(notice.to_string().red().to_string())
            }
            Notice::StopSuggested { .. } | Notice::MajorityStop => {
                self.println(notice.to_string().yellow().to_string())
            }
            Notice::RoundStarted { .. } => self.println(format!("{} {}", "->".cyan(), notice)),
            Notice::Welcome { .. } => self.println(notice.to_string()),
        }
    }

    fn on_turn_started(&self, id: MessageId, role_name: &str, kind: TurnKind) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(role_name.to_string());
        pb.set_message(match kind {
            TurnKind::Discussion { turn: 0 } => "is thinking...",
            TurnKind::Discussion { .. } => "is responding...",
            TurnKind::Synthesis => "is writing the final answer...",
        });
        pb.enable_steady_tick(Duration::from_millis(100));

        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, (role_name.to_string(), pb));
    }

    fn on_turn_delta(&self, id: MessageId, accumulated: &str) {
        if let Some((_, pb)) = self
            .bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            pb.set_message(preview(accumulated).dimmed().to_string());
        }
    }

    fn on_turn_completed(&self, id: MessageId, text: &str, duration_ms: u64) {
        let Some((role, pb)) = self.take_bar(id) else {
            return;
        };
        pb.finish_and_clear();
        let seconds = duration_ms as f64 / 1000.0;
        if self.show_replies {
            self.println(format!(
                "{}\n{}\n",
                format!("── {} ({:.2}s) ──", role, seconds).yellow().bold(),
                text
            ));
        } else {
            self.println(format!("  {} {} ({:.2}s)", "v".green(), role, seconds));
        }
    }

    fn on_turn_failed(&self, id: MessageId, text: &str) {
        let Some((role, pb)) = self.take_bar(id) else {
            return;
        };
        pb.finish_and_clear();
        self.println(format!("  {} {}: {}", "x".red(), role, text));
    }

    fn on_notepad_changed(&self, _content: &str, updated_by: &str) {
        self.println(format!("  {}", format!("Notepad updated by {}", updated_by).dimmed()));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DiscussionObserver for SimpleProgress {
    fn on_notice(&self, notice: &Notice) {
        match notice {
            Notice::Error { .. } | Notice::Interrupted { .. } => eprintln!("{}", notice),
            _ => println!("{} {}", "->".cyan(), notice),
        }
    }

    fn on_turn_completed(&self, _id: MessageId, _text: &str, duration_ms: u64) {
        println!("  {} done in {:.2}s", "v".green(), duration_ms as f64 / 1000.0);
    }

    fn on_turn_failed(&self, _id: MessageId, text: &str) {
        println!("  {} {}", "x".red(), text);
    }

    fn on_notepad_changed(&self, _content: &str, updated_by: &str) {
        println!("  Notepad updated by {}", updated_by);
    }
}

/// Last line of streamed text, cut to fit next to the spinner.
fn preview(accumulated: &str) -> String {
    let last_line = accumulated
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default()
        .trim();
    let count = last_line.chars().count();
    if count <= PREVIEW_WIDTH {
        return last_line.to_string();
    }
    let tail: String = last_line.chars().skip(count - PREVIEW_WIDTH + 3).collect();
    format!("...{}", tail)
}

//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::{HELP_TEXT, ReplCommand, parse_command};
use crate::{ConsoleFormatter, ProgressReporter, ReplConfig};
use colored::Colorize;
use multimind_application::{
    DiscussionObserver, ExportKind, ModelInvoker, NoProgress, RecordExporter, StartDiscussionInput,
    StartDiscussionUseCase,
};
use multimind_domain::{DiscussionRecord, DiscussionSettings, OutputFormat, Question};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// Interactive chat REPL
pub struct ChatRepl<I: ModelInvoker + 'static> {
    controller: Arc<StartDiscussionUseCase<I>>,
    exporter: Option<Arc<dyn RecordExporter>>,
    config: ReplConfig,
    output: OutputFormat,
    settings: DiscussionSettings,
    last_record: Option<DiscussionRecord>,
}

impl<I: ModelInvoker + 'static> ChatRepl<I> {
    /// Create a new ChatRepl starting from the configured discussion settings
    pub fn new(controller: Arc<StartDiscussionUseCase<I>>) -> Self {
        let settings = controller.default_settings();
        Self {
            controller,
            exporter: None,
            config: ReplConfig::default(),
            output: OutputFormat::Final,
            settings,
            last_record: None,
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn RecordExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Session settings, as changed by `/mode`, `/turns` and `/reduced`
    pub fn with_settings(mut self, settings: DiscussionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        if let Some(path) = self.config.history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => warn!("Chat history disabled ({}): {}", path.display(), e),
            }
        }
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("multimind".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(_) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│         Multi-Mind Chat - Chat Mode         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("{}", self.controller.welcome(&self.settings));
        println!();
        println!("Type /help for commands. Ctrl+C stops a running discussion.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                return false;
            }
        };

        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => println!("\n{}\n", HELP_TEXT),
            ReplCommand::Clear => {
                self.controller.reset_notepad();
                self.last_record = None;
                println!("{}", "Notepad cleared.".green());
                self.print_welcome();
            }
            ReplCommand::Notepad => {
                println!("\n{}\n", ConsoleFormatter::indent(&self.controller.notepad(), "  "));
            }
            ReplCommand::Mode(None) => println!("Current mode: {}", self.settings.describe()),
            ReplCommand::Mode(Some(mode)) => {
                self.settings.mode = mode;
                println!("Mode set: {}", self.settings.describe());
            }
            ReplCommand::Turns(turns) => {
                self.settings = self.settings.with_fixed_turns(turns);
                println!("Fixed turns set to {}", self.settings.fixed_turns());
                if self.settings.mode.is_ai_driven() {
                    println!("{}", "(applies once you switch to /mode fixed)".dimmed());
                }
            }
            ReplCommand::Reduced(enabled) => {
                self.settings = self.settings.with_reduced_capacity(enabled);
                println!(
                    "Reduced capacity {}",
                    if enabled { "enabled" } else { "disabled" }
                );
            }
            ReplCommand::Export(kind) => self.export(kind).await,
        }
        false
    }

    async fn export(&self, kind: ExportKind) {
        let Some(record) = &self.last_record else {
            println!("Nothing to export yet. Ask a question first.");
            return;
        };
        let Some(exporter) = &self.exporter else {
            println!("Export is not configured.");
            return;
        };
        match exporter.export(record, kind).await {
            Ok(path) => println!("Exported to {}", path.display()),
            Err(e) => eprintln!("{} {}", "Export failed:".red(), e),
        }
    }

    async fn process_question(&mut self, question: &str) {
        println!();

        let question = match Question::try_new(question) {
            Ok(q) => q,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };
        let input = StartDiscussionInput::new(question).with_settings(self.settings);

        let cancellation = CancellationToken::new();
        let watcher = tokio::spawn({
            let cancellation = cancellation.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancellation.cancel();
                }
            }
        });

        let reporter = ProgressReporter::new().with_replies(true);
        let observer: &dyn DiscussionObserver = if self.config.show_progress {
            &reporter
        } else {
            &NoProgress
        };
        let result = self.controller.execute(input, observer, &cancellation).await;
        watcher.abort();

        match result {
            Ok(report) => {
                let format = match (self.config.show_progress, self.output) {
                    // Replies were already shown as they finished
                    (true, OutputFormat::Full) => OutputFormat::Final,
                    (_, format) => format,
                };
                println!("{}", ConsoleFormatter::format(&report, format));
                self.last_record = Some(report.run.record);
            }
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
        println!();
    }
}

//! CLI entrypoint for multimind
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use multimind_application::{
    DiscussionObserver, ExportKind, NoProgress, RecordExporter, RunDiscussionUseCase,
    StartDiscussionInput, StartDiscussionUseCase,
};
use multimind_domain::{OutputFormat, Question};
use multimind_infrastructure::{
    ConfigLoader, DiscussionExporter, FileConfig, FileConfigProvider, JsonlDiscussionLogger,
    OpenAiInvoker, load_image,
};
use multimind_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputConfig, ProgressReporter, ReplConfig,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| config.logging.dir.as_ref().map(PathBuf::from));
    let _log_guard = init_logging(cli.verbose, log_dir.as_deref());

    info!("Starting multimind");

    match config.validate() {
        Ok(deferred) => {
            for problem in deferred {
                warn!("{}", problem);
            }
        }
        Err(e) => bail!("Invalid configuration: {}", e),
    }

    let output = output_config(&cli, &config);
    output.apply_color_choice();

    // === Dependency Injection ===
    let invoker = Arc::new(OpenAiInvoker::new());
    let mut engine = RunDiscussionUseCase::new(invoker);
    if (cli.log_dir.is_some() || config.logging.conversation_log)
        && let Some(logger) = log_dir.as_ref().and_then(|dir| JsonlDiscussionLogger::in_dir(dir))
    {
        info!("Conversation log: {}", logger.path().display());
        engine = engine.with_conversation_logger(Arc::new(logger));
    }
    let provider = Arc::new(FileConfigProvider::new(config.clone()));
    let controller = Arc::new(StartDiscussionUseCase::new(provider, engine));
    let settings = cli.discussion_settings(controller.default_settings());
    let exporter = Arc::new(DiscussionExporter::new(output.export_dir.clone()));

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_file.as_ref().map(PathBuf::from),
        };
        let mut repl = ChatRepl::new(controller)
            .with_settings(settings)
            .with_config(repl_config)
            .with_output(output.format)
            .with_exporter(exporter);

        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - question or image is required
    let image = match &cli.image {
        Some(path) => Some(load_image(path).await?),
        None => None,
    };
    let question = match (cli.question.clone(), image.is_some()) {
        (Some(q), false) => Question::try_new(q)?,
        (q, true) => Question::for_image(q.unwrap_or_default()),
        (None, false) => bail!("Question is required. Use --chat for interactive mode."),
    };

    let mut input = StartDiscussionInput::new(question).with_settings(settings);
    if let Some(image) = image {
        input = input.with_image(image);
    }

    if !cli.quiet && output.format != OutputFormat::Json {
        eprintln!("{}", controller.welcome(&settings));
        eprintln!();
    }

    let cancellation = CancellationToken::new();
    tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancellation.cancel();
            }
        }
    });

    let reporter = ProgressReporter::new();
    let observer: &dyn DiscussionObserver = if cli.quiet { &NoProgress } else { &reporter };
    let report = controller.execute(input, observer, &cancellation).await?;

    println!("{}", ConsoleFormatter::format(&report, output.format));

    if let Some(format) = cli.export {
        let kind = ExportKind::from(format);
        match exporter.export(&report.run.record, kind).await {
            Ok(path) => eprintln!("Exported to {}", path.display()),
            Err(e) => warn!("Export failed: {}", e),
        }
    }

    let outcome = &report.run.outcome;
    Ok(if outcome.is_completed() {
        ExitCode::SUCCESS
    } else if outcome.is_interrupted() {
        ExitCode::from(130)
    } else {
        ExitCode::FAILURE
    })
}

/// Console logging filtered by `-v`, plus a daily file log when a directory is given.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter).with(console);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "multimind.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// CLI flags over the `[output]` section.
fn output_config(cli: &Cli, config: &FileConfig) -> OutputConfig {
    let defaults = OutputConfig::default();
    OutputConfig {
        format: cli
            .output
            .map(OutputFormat::from)
            .or(config.output.format)
            .unwrap_or(defaults.format),
        color: config.output.color && !cli.no_color,
        export_dir: cli
            .export_dir
            .clone()
            .or_else(|| config.output.export_dir.as_ref().map(PathBuf::from))
            .unwrap_or(defaults.export_dir),
    }
}

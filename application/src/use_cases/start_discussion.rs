//! Start Discussion use case
//!
//! The session controller. Reads the configuration snapshot once, validates
//! it, joins roles with their models and channels, seeds the discussion
//! state, and runs the engine. Cancellation is acknowledged immediately with
//! an [`Notice::Interrupted`] notice even though the in-flight model call is
//! allowed to finish (its result is discarded by the engine).

use crate::ports::config_provider::ConfigSnapshotProvider;
use crate::ports::model_invoker::ModelInvoker;
use crate::ports::progress::DiscussionObserver;
use crate::use_cases::run_discussion::{DiscussionRun, RunDiscussionInput, RunDiscussionUseCase};
use multimind_domain::{
    ActiveRole, ConfigSnapshot, DiscussionSettings, DiscussionState, DiscussionStats,
    INITIAL_NOTEPAD_CONTENT, ImageAttachment, Notice, Question, welcome_message,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Reasons a discussion cannot start. Nothing has been invoked when one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StartDiscussionError {
    #[error("No API channel is configured. Add at least one channel to the configuration.")]
    NoChannels,

    #[error("No active AI roles. Activate at least one role in the configuration.")]
    NoActiveRoles,

    #[error("These roles have no API key for their channel: {}", .0.join(", "))]
    MissingApiKeys(Vec<String>),

    #[error(
        "An image is attached but no active role uses a model that supports images. Remove the image or activate a role with an image-capable model."
    )]
    ImageNotSupported,

    #[error("A discussion is already running")]
    AlreadyRunning,
}

/// Input for the StartDiscussion use case
#[derive(Debug, Clone)]
pub struct StartDiscussionInput {
    pub question: Question,
    pub image: Option<ImageAttachment>,
    /// Overrides the provider's settings for this discussion only
    pub settings: Option<DiscussionSettings>,
}

impl StartDiscussionInput {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            image: None,
            settings: None,
        }
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_settings(mut self, settings: DiscussionSettings) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// Everything a finished (or halted) discussion produced.
#[derive(Debug, Clone)]
pub struct DiscussionReport {
    pub run: DiscussionRun,
    pub stats: DiscussionStats,
    pub elapsed: Duration,
}

/// Check the snapshot in order and return the roles that will take part.
///
/// Roles pointing at a missing model or channel are skipped with a warning.
pub fn validate_configuration(
    snapshot: &ConfigSnapshot,
    has_image: bool,
) -> Result<Vec<ActiveRole>, StartDiscussionError> {
    if snapshot.channels.is_empty() {
        return Err(StartDiscussionError::NoChannels);
    }

    let resolution = snapshot.resolve_active_roles();
    for dangling in &resolution.dangling {
        warn!("Skipping role: {}", dangling);
    }
    let active = resolution.active;
    if active.is_empty() {
        return Err(StartDiscussionError::NoActiveRoles);
    }

    let missing: Vec<String> = active
        .iter()
        .filter(|role| !role.channel.has_api_key())
        .map(|role| format!("{}({})", role.name(), role.channel.name))
        .collect();
    if !missing.is_empty() {
        return Err(StartDiscussionError::MissingApiKeys(missing));
    }

    if has_image && !active.iter().any(ActiveRole::supports_images) {
        return Err(StartDiscussionError::ImageNotSupported);
    }

    Ok(active)
}

/// Clears the running flag when a discussion ends, however it ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Use case for starting discussions within one session.
///
/// The notepad outlives individual discussions: each discussion starts from
/// the notepad the previous one left behind until [`reset_notepad`] is
/// called.
///
/// [`reset_notepad`]: StartDiscussionUseCase::reset_notepad
pub struct StartDiscussionUseCase<I: ModelInvoker + 'static> {
    config: Arc<dyn ConfigSnapshotProvider>,
    engine: RunDiscussionUseCase<I>,
    notepad: Mutex<String>,
    running: AtomicBool,
}

impl<I: ModelInvoker + 'static> StartDiscussionUseCase<I> {
    pub fn new(config: Arc<dyn ConfigSnapshotProvider>, engine: RunDiscussionUseCase<I>) -> Self {
        Self {
            config,
            engine,
            notepad: Mutex::new(INITIAL_NOTEPAD_CONTENT.to_string()),
            running: AtomicBool::new(false),
        }
    }

    /// Current session notepad.
    pub fn notepad(&self) -> String {
        self.notepad
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Restore the initial notepad content.
    pub fn reset_notepad(&self) {
        *self.notepad.lock().unwrap_or_else(PoisonError::into_inner) =
            INITIAL_NOTEPAD_CONTENT.to_string();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Settings the provider currently reports.
    pub fn default_settings(&self) -> DiscussionSettings {
        self.config.discussion_settings()
    }

    /// Welcome text for the current configuration and `settings`.
    pub fn welcome(&self, settings: &DiscussionSettings) -> String {
        let snapshot = self.config.snapshot();
        let roles = snapshot.resolve_active_roles().active;
        let names: Vec<&str> = roles.iter().map(ActiveRole::name).collect();
        welcome_message(snapshot.channels.len(), &names, settings)
    }

    /// Run one discussion to a terminal state.
    pub async fn execute(
        &self,
        input: StartDiscussionInput,
        observer: &dyn DiscussionObserver,
        cancellation: &CancellationToken,
    ) -> Result<DiscussionReport, StartDiscussionError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(StartDiscussionError::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        let snapshot = self.config.snapshot();
        let settings = input
            .settings
            .unwrap_or_else(|| self.config.discussion_settings());
        let roles = validate_configuration(&snapshot, input.image.is_some())?;

        info!(
            "Discussion starting: {} roles, {}",
            roles.len(),
            settings.describe()
        );

        let notepad = self.notepad();
        let state = DiscussionState::new(
            input.question.content(),
            input.image,
            roles,
            settings.mode,
            settings.max_turns_for_loop(),
            &notepad,
        );
        let run_input = RunDiscussionInput::new(state, settings, notepad);

        let started = Instant::now();
        let mut notified = false;
        let engine = self
            .engine
            .execute_with_progress(run_input, observer, cancellation);
        tokio::pin!(engine);

        let run = loop {
            tokio::select! {
                run = &mut engine => break run,
                _ = cancellation.cancelled(), if !notified => {
                    notified = true;
                    observer.on_notice(&Notice::Interrupted { elapsed: started.elapsed() });
                }
            }
        };
        if run.outcome.is_interrupted() && !notified {
            observer.on_notice(&Notice::Interrupted {
                elapsed: started.elapsed(),
            });
        }

        *self.notepad.lock().unwrap_or_else(PoisonError::into_inner) = run.notepad.clone();

        let stats = DiscussionStats::from_record(&run.record);
        Ok(DiscussionReport {
            run,
            stats,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::config_provider::StaticConfig;
    use crate::use_cases::run_discussion::DiscussionOutcome;
    use crate::use_cases::run_discussion::tests::{RecordingObserver, ScriptedInvoker};
    use pretty_assertions::assert_eq;
    use multimind_domain::{Channel, DiscussionMode, Model, Role};

    fn snapshot() -> ConfigSnapshot {
        ConfigSnapshot::new(
            vec![Channel::new("c1", "Official", "https://api.openai.com/v1").with_api_key("sk-test")],
            vec![Model::new("m1", "Mini", "gpt-4.1-mini", "c1").with_images(true)],
            vec![
                Role::new("cognito", "Cognito", "m1"),
                Role::new("muse", "Muse", "m1"),
            ],
        )
    }

    fn controller(snapshot: ConfigSnapshot, invoker: Arc<ScriptedInvoker>) -> StartDiscussionUseCase<ScriptedInvoker> {
        let settings = DiscussionSettings::new(DiscussionMode::FixedTurns).with_fixed_turns(1);
        StartDiscussionUseCase::new(
            Arc::new(StaticConfig::new(snapshot, settings)),
            RunDiscussionUseCase::new(invoker),
        )
    }

    fn question() -> StartDiscussionInput {
        StartDiscussionInput::new(Question::try_new("What is 2+2?").unwrap())
    }

    fn image() -> ImageAttachment {
        ImageAttachment {
            mime_type: "image/png".into(),
            base64_data: "AAAA".into(),
            name: "a.png".into(),
            size_bytes: 3,
        }
    }

    #[test]
    fn test_validation_order() {
        let empty = ConfigSnapshot::default();
        assert_eq!(validate_configuration(&empty, false), Err(StartDiscussionError::NoChannels));

        let mut no_roles = snapshot();
        no_roles.roles = vec![Role::new("cognito", "Cognito", "m1").inactive()];
        assert_eq!(
            validate_configuration(&no_roles, false),
            Err(StartDiscussionError::NoActiveRoles)
        );

        let mut no_key = snapshot();
        no_key.channels[0].api_key.clear();
        assert_eq!(
            validate_configuration(&no_key, false),
            Err(StartDiscussionError::MissingApiKeys(vec![
                "Cognito(Official)".to_string(),
                "Muse(Official)".to_string()
            ]))
        );

        let mut no_images = snapshot();
        no_images.models[0].supports_images = false;
        assert!(validate_configuration(&no_images, false).is_ok());
        assert_eq!(
            validate_configuration(&no_images, true),
            Err(StartDiscussionError::ImageNotSupported)
        );
    }

    #[test]
    fn test_dangling_roles_are_skipped() {
        let mut snap = snapshot();
        snap.roles.push(Role::new("ghost", "Ghost", "missing-model"));
        let roles = validate_configuration(&snap, false).unwrap();
        let names: Vec<&str> = roles.iter().map(ActiveRole::name).collect();
        assert_eq!(names, vec!["Cognito", "Muse"]);
    }

    #[test]
    fn test_missing_keys_message_lists_roles() {
        let err = StartDiscussionError::MissingApiKeys(vec!["Cognito(Official)".into(), "Muse(Backup)".into()]);
        assert_eq!(
            err.to_string(),
            "These roles have no API key for their channel: Cognito(Official), Muse(Backup)"
        );
    }

    #[tokio::test]
    async fn test_config_error_invokes_nothing() {
        let invoker = Arc::new(ScriptedInvoker::texts(&[]));
        let mut snap = snapshot();
        snap.channels[0].api_key.clear();
        let controller = controller(snap, invoker.clone());

        let result = controller
            .execute(question(), &RecordingObserver::default(), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(StartDiscussionError::MissingApiKeys(_))));
        assert!(invoker.requests.lock().unwrap().is_empty());
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn test_completed_discussion_reports_stats_and_keeps_notepad() {
        let invoker = Arc::new(ScriptedInvoker::texts(&[
            "Four.<notepad_update>2+2=4</notepad_update>",
            "Yes.",
            "Agreed.",
            "Same.",
            "The answer is 4.",
        ]));
        let controller = controller(snapshot(), invoker.clone());

        let report = controller
            .execute(question(), &RecordingObserver::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.run.outcome.is_completed());
        assert_eq!(report.stats.total_turns, 5);
        assert_eq!(controller.notepad(), "2+2=4");

        assert!(invoker.prompts()[0].contains(INITIAL_NOTEPAD_CONTENT));
        controller.reset_notepad();
        assert_eq!(controller.notepad(), INITIAL_NOTEPAD_CONTENT);
    }

    #[tokio::test]
    async fn test_settings_override_applies() {
        let invoker = Arc::new(ScriptedInvoker::texts(&[]));
        let controller = controller(snapshot(), invoker.clone());
        let settings = DiscussionSettings::new(DiscussionMode::AiDriven);

        let report = controller
            .execute(
                question().with_settings(settings),
                &RecordingObserver::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(report.run.record.settings.mode, DiscussionMode::AiDriven);
        assert!(invoker.prompts()[0].contains("Instruction for ending discussion"));
    }

    #[tokio::test]
    async fn test_image_reaches_invoker() {
        let invoker = Arc::new(ScriptedInvoker::texts(&[]));
        let controller = controller(snapshot(), invoker.clone());

        controller
            .execute(
                question().with_image(image()),
                &RecordingObserver::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let requests = invoker.requests.lock().unwrap();
        assert!(requests.iter().all(|r| r.image.as_ref() == Some(&image())));
    }

    #[tokio::test]
    async fn test_interrupt_emits_one_notice() {
        let token = CancellationToken::new();
        let invoker = Arc::new(ScriptedInvoker::texts(&["Four.", "late"]).cancelling_on(2, token.clone()));
        let observer = RecordingObserver::default();
        let controller = controller(snapshot(), invoker);

        let report = controller.execute(question(), &observer, &token).await.unwrap();

        assert_eq!(report.run.outcome, DiscussionOutcome::Interrupted);
        let interrupted = observer
            .notices()
            .iter()
            .filter(|n| matches!(n, Notice::Interrupted { .. }))
            .count();
        assert_eq!(interrupted, 1);
        assert!(report.run.record.was_interrupted);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_welcome_lists_roles() {
        let controller = controller(snapshot(), Arc::new(ScriptedInvoker::texts(&[])));
        let text = controller.welcome(&controller.default_settings());
        assert!(text.contains("Cognito"));
        assert!(text.contains("Muse"));
    }
}

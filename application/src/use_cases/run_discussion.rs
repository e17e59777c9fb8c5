//! Run Discussion use case
//!
//! The discussion engine: drives a [`DiscussionState`] from the first role
//! invocation to the synthesized final answer.
//!
//! The engine is an explicit loop. Each iteration checks cancellation, asks
//! the state for the [`NextStep`], and performs it. Only one model call is
//! ever in flight; between calls every transition is synchronous.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_invoker::{InvocationError, InvokeOutcome, InvokeRequest, ModelInvoker};
use crate::ports::progress::{DiscussionObserver, NoProgress, TurnKind};
use crate::use_cases::shared::{MessageCounter, check_cancelled, elapsed_ms};
use multimind_domain::core::string::preview;
use multimind_domain::{
    ActiveRole, DiscussionRecord, DiscussionSettings, DiscussionState, DomainError,
    ImageAttachment, NextStep, Notice, PromptTemplate, StopVote, StreamEvent, parse_response,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a turn did not produce a usable reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TurnAbort {
    #[error("Discussion cancelled")]
    Cancelled,

    #[error("Invalid API key for role {role} (channel: {channel})")]
    AuthFailed { role: String, channel: String },

    #[error("{0}")]
    Failed(String),
}

/// How a discussion ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscussionOutcome {
    /// Synthesis succeeded; holds the spoken part of the final answer
    Completed { final_answer: String },
    /// Cancellation was observed; no synthesis happened
    Interrupted,
    /// A channel rejected its API key
    AuthFailed { role: String, channel: String },
    /// Any other invocation failure
    Failed { message: String },
}

impl DiscussionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DiscussionOutcome::Completed { .. })
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, DiscussionOutcome::Interrupted)
    }
}

impl From<TurnAbort> for DiscussionOutcome {
    fn from(abort: TurnAbort) -> Self {
        match abort {
            TurnAbort::Cancelled => DiscussionOutcome::Interrupted,
            TurnAbort::AuthFailed { role, channel } => DiscussionOutcome::AuthFailed { role, channel },
            TurnAbort::Failed(message) => DiscussionOutcome::Failed { message },
        }
    }
}

/// Input for the RunDiscussion use case
#[derive(Debug, Clone)]
pub struct RunDiscussionInput {
    pub state: DiscussionState,
    pub settings: DiscussionSettings,
    /// Live notepad content at discussion start
    pub notepad: String,
    pub record: DiscussionRecord,
}

impl RunDiscussionInput {
    pub fn new(state: DiscussionState, settings: DiscussionSettings, notepad: impl Into<String>) -> Self {
        let notepad = notepad.into();
        let record = DiscussionRecord::begin(
            state.user_query.clone(),
            state.image.as_ref(),
            settings,
            &state.role_order,
            notepad.clone(),
        );
        Self {
            state,
            settings,
            notepad,
            record,
        }
    }
}

/// Result of one discussion run
#[derive(Debug, Clone)]
pub struct DiscussionRun {
    pub outcome: DiscussionOutcome,
    /// Transcript lines fed back into prompts
    pub discussion_log: Vec<String>,
    /// Notepad content after the run
    pub notepad: String,
    pub record: DiscussionRecord,
    /// Model calls made, including failed ones
    pub invocations: usize,
}

struct TurnReply {
    text: String,
    duration_ms: u64,
}

/// Per-run mutable data besides the state machine itself.
struct RunContext<'a> {
    settings: DiscussionSettings,
    notepad: String,
    record: DiscussionRecord,
    invocations: usize,
    observer: &'a dyn DiscussionObserver,
    cancellation: &'a CancellationToken,
}

/// Use case for running one discussion
pub struct RunDiscussionUseCase<I: ModelInvoker + 'static> {
    invoker: Arc<I>,
    conversation_logger: Arc<dyn ConversationLogger>,
    message_ids: Arc<MessageCounter>,
}

impl<I: ModelInvoker + 'static> RunDiscussionUseCase<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self {
            invoker,
            conversation_logger: Arc::new(NoConversationLogger),
            message_ids: Arc::new(MessageCounter::default()),
        }
    }

    /// Set a conversation logger for structured event logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDiscussionInput, cancellation: &CancellationToken) -> DiscussionRun {
        self.execute_with_progress(input, &NoProgress, cancellation).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDiscussionInput,
        observer: &dyn DiscussionObserver,
        cancellation: &CancellationToken,
    ) -> DiscussionRun {
        let started = Instant::now();
        let RunDiscussionInput {
            mut state,
            settings,
            notepad,
            record,
        } = input;

        info!(
            "Starting discussion with {} roles ({} mode, max turns {})",
            state.role_count(),
            settings.mode,
            state.max_turns_for_loop
        );
        self.conversation_logger.log(ConversationEvent::new(
            "discussion_started",
            serde_json::json!({
                "query": state.user_query,
                "roles": state.role_order.iter().map(|r| r.id().as_str()).collect::<Vec<_>>(),
                "mode": settings.mode.as_str(),
                "max_turns": state.max_turns_for_loop,
                "has_image": state.has_image(),
            }),
        ));

        let mut ctx = RunContext {
            settings,
            notepad,
            record,
            invocations: 0,
            observer,
            cancellation,
        };

        let outcome = match self.drive(&mut state, &mut ctx).await {
            Ok(final_answer) => DiscussionOutcome::Completed { final_answer },
            Err(abort) => abort.into(),
        };

        let total_ms = elapsed_ms(started);
        ctx.record
            .finish(outcome.is_completed(), outcome.is_interrupted(), total_ms);

        match &outcome {
            DiscussionOutcome::Completed { .. } => {
                info!("Discussion completed in {}ms", total_ms)
            }
            DiscussionOutcome::Interrupted => info!("Discussion interrupted after {}ms", total_ms),
            other => warn!("Discussion halted: {:?}", other),
        }
        self.conversation_logger.log(ConversationEvent::new(
            "discussion_finished",
            serde_json::json!({
                "outcome": format!("{:?}", outcome),
                "invocations": ctx.invocations,
                "log_entries": state.discussion_log.len(),
                "duration_ms": total_ms,
            }),
        ));

        DiscussionRun {
            outcome,
            discussion_log: state.discussion_log,
            notepad: ctx.notepad,
            record: ctx.record,
            invocations: ctx.invocations,
        }
    }

    /// The engine loop. Returns the spoken final answer.
    async fn drive(&self, state: &mut DiscussionState, ctx: &mut RunContext<'_>) -> Result<String, TurnAbort> {
        loop {
            check_cancelled(ctx.cancellation)?;

            match state.next_step() {
                NextStep::BeginRound => {
                    state.begin_round();
                    info!("Discussion round {} started", state.current_turn);
                    ctx.observer.on_notice(&Notice::RoundStarted {
                        turn: state.current_turn,
                    });
                }
                NextStep::Synthesize => return self.synthesize(state, ctx).await,
                NextStep::Invoke(index) => {
                    let role = state.role_order[index].clone();
                    let prompt = PromptTemplate::for_turn(state, &role, &ctx.notepad, ctx.settings.mode);
                    let kind = TurnKind::Discussion {
                        turn: state.current_turn,
                    };
                    let reply = self
                        .run_turn(&role, prompt, state.image.as_ref(), kind, ctx)
                        .await?;

                    let parsed = parse_response(&reply.text);
                    self.apply_notepad(&role, parsed.new_notepad_content, ctx);
                    state.record_reply(&parsed.spoken_text);
                    ctx.record
                        .push_turn(&role, parsed.spoken_text, reply.duration_ms);

                    if ctx.settings.mode.is_ai_driven() && parsed.discussion_should_end {
                        self.register_stop_vote(state, &role, ctx);
                    }
                }
            }
        }
    }

    async fn synthesize(&self, state: &DiscussionState, ctx: &mut RunContext<'_>) -> Result<String, TurnAbort> {
        let Some(role) = state.synthesis_role().cloned() else {
            return Err(TurnAbort::Failed(DomainError::NoActiveRoles.to_string()));
        };
        info!("Synthesis by {}", role.name());

        let prompt = PromptTemplate::synthesis(state, &ctx.notepad);
        let reply = self
            .run_turn(&role, prompt, state.image.as_ref(), TurnKind::Synthesis, ctx)
            .await?;

        let parsed = parse_response(&reply.text);
        self.apply_notepad(&role, parsed.new_notepad_content, ctx);
        ctx.record
            .set_final_answer(&role, parsed.spoken_text.clone(), reply.duration_ms);
        Ok(parsed.spoken_text)
    }

    /// Invoke one role and classify the result.
    async fn run_turn(
        &self,
        role: &ActiveRole,
        prompt: String,
        image: Option<&ImageAttachment>,
        kind: TurnKind,
        ctx: &mut RunContext<'_>,
    ) -> Result<TurnReply, TurnAbort> {
        let observer = ctx.observer;
        let cancellation = ctx.cancellation;

        observer.on_notice(&match kind {
            TurnKind::Discussion { turn } => Notice::RoleThinking {
                role: role.name().to_string(),
                model: role.model.name.clone(),
                channel: role.channel.name.clone(),
                turn,
            },
            TurnKind::Synthesis => Notice::Synthesizing {
                role: role.name().to_string(),
                model: role.model.name.clone(),
                channel: role.channel.name.clone(),
            },
        });

        let id = self.message_ids.next();
        observer.on_turn_started(id, role.name(), kind);
        debug!("Invoking {} ({:?}) as {}", role.name(), kind, id);
        self.conversation_logger.log(ConversationEvent::new(
            "role_prompt",
            serde_json::json!({
                "role": role.id().as_str(),
                "model": role.model.api_name,
                "kind": format!("{:?}", kind),
                "prompt": prompt,
            }),
        ));

        let request = InvokeRequest::for_role(role, prompt, image, ctx.settings.reduced_capacity);
        let mut on_event = |event: StreamEvent| {
            if !cancellation.is_cancelled() {
                observer.on_turn_delta(id, event.text());
            }
        };
        let mut outcome = self.invoker.invoke(request, &mut on_event).await;
        ctx.invocations += 1;

        // A straggling result after cancellation is dropped; only the open message is closed.
        if cancellation.is_cancelled() {
            debug!("Discarding reply for {} after cancellation", id);
            observer.on_turn_failed(id, "Interrupted");
            return Err(TurnAbort::Cancelled);
        }

        if outcome.is_success() && outcome.text.trim().is_empty() {
            outcome = InvokeOutcome::from_error(
                &InvocationError::EmptyResponse,
                &role.model.api_name,
                outcome.duration_ms,
            );
        }

        if outcome.is_auth_error() {
            warn!("{}: API key rejected by channel {}", role.name(), role.channel.name);
            observer.on_turn_failed(
                id,
                &format!(
                    "Invalid API key (channel: {}). Check the key in your configuration.",
                    role.channel.name
                ),
            );
            return Err(TurnAbort::AuthFailed {
                role: role.name().to_string(),
                channel: role.channel.name.clone(),
            });
        }

        if let Some(error) = &outcome.error {
            warn!("{} failed: {}", role.name(), error);
            let message = format!("{}: {}", role.name(), outcome.text);
            observer.on_turn_failed(id, &outcome.text);
            observer.on_notice(&Notice::Error {
                message: message.clone(),
            });
            self.conversation_logger.log(ConversationEvent::new(
                "role_error",
                serde_json::json!({
                    "role": role.id().as_str(),
                    "error": error,
                    "text": outcome.text,
                }),
            ));
            return Err(TurnAbort::Failed(message));
        }

        observer.on_turn_completed(id, &outcome.text, outcome.duration_ms);
        debug!(
            "{} replied in {}ms: {}",
            role.name(),
            outcome.duration_ms,
            preview(&outcome.text, 80)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "role_reply",
            serde_json::json!({
                "role": role.id().as_str(),
                "duration_ms": outcome.duration_ms,
                "text": outcome.text,
            }),
        ));

        Ok(TurnReply {
            text: outcome.text,
            duration_ms: outcome.duration_ms,
        })
    }

    /// Replace the notepad when the reply carried a block, even an empty one.
    fn apply_notepad(&self, role: &ActiveRole, content: Option<String>, ctx: &mut RunContext<'_>) {
        let Some(content) = content else {
            return;
        };
        debug!("{} replaced the notepad ({} chars)", role.name(), content.len());
        ctx.observer.on_notepad_changed(&content, role.name());
        self.conversation_logger.log(ConversationEvent::new(
            "notepad_updated",
            serde_json::json!({
                "role": role.id().as_str(),
                "content": content,
            }),
        ));
        ctx.record.push_notepad_update(role, content.clone());
        ctx.notepad = content;
    }

    fn register_stop_vote(&self, state: &mut DiscussionState, role: &ActiveRole, ctx: &RunContext<'_>) {
        let vote = state.register_stop_vote();
        info!(
            "{} voted to stop (turn {}, votes {}/{}): {:?}",
            role.name(),
            state.current_turn,
            state.discussion_end_count,
            state.majority_threshold(),
            vote
        );
        self.conversation_logger.log(ConversationEvent::new(
            "stop_vote",
            serde_json::json!({
                "role": role.id().as_str(),
                "turn": state.current_turn,
                "end_count": state.discussion_end_count,
                "majority": matches!(vote, StopVote::MajorityReached),
            }),
        ));
        let notice = match vote {
            StopVote::Suggested => Notice::StopSuggested {
                role: role.name().to_string(),
            },
            StopVote::MajorityReached => Notice::MajorityStop,
        };
        ctx.observer.on_notice(&notice);
    }
}

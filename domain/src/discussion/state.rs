//! Discussion state machine.
//!
//! [`DiscussionState`] holds everything the engine needs between role
//! invocations. The transitions live here as plain methods so they can be
//! tested without any I/O; the application layer only drives the loop.
//!
//! ```text
//!  round 0: role[0] → role[1] → … → role[n-1]
//!     │ (no stop vote and max_turns > 0)        │ (stop vote or max_turns == 0)
//!     ▼                                         ▼
//!  round 1: role[0] → … until exit check ──▶ synthesis (role[0]) ──▶ done
//! ```

use crate::config::{ActiveRole, RoleId};
use crate::discussion::mode::DiscussionMode;
use crate::prompt::{AI_DRIVEN_DISCUSSION_INSTRUCTION, notepad_instructions};
use serde::{Deserialize, Serialize};

/// An image attached to the user's query, already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub base64_data: String,
    /// Original file name, for records and transcripts
    pub name: String,
    /// Size of the decoded image in bytes
    pub size_bytes: usize,
}

impl ImageAttachment {
    /// `data:` URL form accepted by chat-completion APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// What the engine should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Invoke the role at this index of `role_order`
    Invoke(usize),
    /// Round zero finished; open the discussion round
    BeginRound,
    /// Produce the final answer
    Synthesize,
}

/// How a stop vote changed the discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopVote {
    /// The vote was recorded; the discussion goes on unless the flag was set
    Suggested,
    /// Enough roles agreed; the discussion ends at the next step
    MajorityReached,
}

/// State of one discussion, owned by the engine from start to teardown.
#[derive(Debug, Clone)]
pub struct DiscussionState {
    /// Speaking order, fixed for the whole discussion
    pub role_order: Vec<ActiveRole>,
    /// Index of the role about to speak; `role_order.len()` means round complete
    pub current_role_index: usize,
    /// 0 for the opening round, 1 for the discussion round
    pub current_turn: u32,
    pub max_turns_for_loop: u32,
    /// `"{role name}: {spoken text}"` for each successful non-final reply
    pub discussion_log: Vec<String>,
    /// Speaker id for each entry of `discussion_log`
    pub speakers: Vec<RoleId>,
    pub is_first_message: bool,
    /// Sticky: once a stop is agreed it stays agreed
    pub previous_ai_signaled_stop: bool,
    pub discussion_end_count: usize,
    pub user_query: String,
    pub image: Option<ImageAttachment>,
    /// Notepad + mode instructions captured at start
    pub common_prompt_instructions: String,
}

impl DiscussionState {
    /// Build the initial state for a discussion.
    ///
    /// `notepad` is the notepad content at the moment the discussion starts;
    /// it is frozen into the common instructions used by round zero.
    pub fn new(
        user_query: impl Into<String>,
        image: Option<ImageAttachment>,
        role_order: Vec<ActiveRole>,
        mode: DiscussionMode,
        max_turns_for_loop: u32,
        notepad: &str,
    ) -> Self {
        let mut common_prompt_instructions = notepad_instructions(notepad);
        if mode.is_ai_driven() {
            common_prompt_instructions.push_str(AI_DRIVEN_DISCUSSION_INSTRUCTION);
        }

        Self {
            role_order,
            current_role_index: 0,
            current_turn: 0,
            max_turns_for_loop,
            discussion_log: Vec::new(),
            speakers: Vec::new(),
            is_first_message: true,
            previous_ai_signaled_stop: false,
            discussion_end_count: 0,
            user_query: user_query.into(),
            image,
            common_prompt_instructions,
        }
    }

    pub fn role_count(&self) -> usize {
        self.role_order.len()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Decide the next step. Does not mutate state.
    pub fn next_step(&self) -> NextStep {
        let round_complete = self.current_role_index >= self.role_count();

        if self.current_turn == 0 && round_complete {
            if !self.previous_ai_signaled_stop && self.max_turns_for_loop > 0 {
                return NextStep::BeginRound;
            }
            return NextStep::Synthesize;
        }

        if self.current_turn > 0
            && (self.current_turn > self.max_turns_for_loop
                || self.previous_ai_signaled_stop
                || round_complete)
        {
            return NextStep::Synthesize;
        }

        NextStep::Invoke(self.current_role_index)
    }

    /// Move from round zero into the discussion round.
    pub fn begin_round(&mut self) {
        self.current_turn = 1;
        self.current_role_index = 0;
        self.discussion_end_count = 0;
    }

    /// The role about to speak, if the round is not complete.
    pub fn current_role(&self) -> Option<&ActiveRole> {
        self.role_order.get(self.current_role_index)
    }

    /// The role that writes the final answer.
    pub fn synthesis_role(&self) -> Option<&ActiveRole> {
        self.role_order.first()
    }

    /// Names of every role except `speaker`, in speaking order.
    pub fn other_role_names(&self, speaker: &RoleId) -> Vec<&str> {
        self.role_order
            .iter()
            .filter(|r| r.id() != speaker)
            .map(|r| r.name())
            .collect()
    }

    /// Record a successful reply from the current role and advance.
    pub fn record_reply(&mut self, spoken_text: &str) {
        if let Some(role) = self.role_order.get(self.current_role_index) {
            self.discussion_log
                .push(format!("{}: {}", role.name(), spoken_text));
            self.speakers.push(role.id().clone());
        }
        self.is_first_message = false;
        self.current_role_index += 1;
    }

    /// Register a stop vote from the role that just spoke.
    ///
    /// In round zero any single vote sets the stop flag. In the discussion
    /// round votes are counted, and the flag is set once half the roles
    /// (rounded up) agree, or immediately if it was already set.
    pub fn register_stop_vote(&mut self) -> StopVote {
        if self.current_turn == 0 {
            self.previous_ai_signaled_stop = true;
            return StopVote::Suggested;
        }

        self.discussion_end_count += 1;
        if self.previous_ai_signaled_stop || self.discussion_end_count >= self.majority_threshold() {
            self.previous_ai_signaled_stop = true;
            StopVote::MajorityReached
        } else {
            StopVote::Suggested
        }
    }

    /// Votes needed to end the discussion round.
    pub fn majority_threshold(&self) -> usize {
        self.role_count().div_ceil(2)
    }

    /// The transcript fed back into prompts.
    pub fn joined_log(&self) -> String {
        self.discussion_log.join("\n")
    }
}

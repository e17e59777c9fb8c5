//! Discussion modes and turn limits.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub const DEFAULT_MANUAL_FIXED_TURNS: u32 = 2;
pub const MIN_MANUAL_FIXED_TURNS: u32 = 1;
pub const MAX_MANUAL_FIXED_TURNS: u32 = 5;
pub const MAX_AI_DRIVEN_DISCUSSION_TURNS_PER_MODEL: u32 = 3;

/// How the length of a discussion is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiscussionMode {
    /// The operator picks the turn count up front
    #[default]
    #[serde(rename = "fixed")]
    FixedTurns,
    /// Roles vote to stop with the discussion-complete tag
    #[serde(rename = "ai-driven")]
    AiDriven,
}

impl DiscussionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionMode::FixedTurns => "fixed",
            DiscussionMode::AiDriven => "ai-driven",
        }
    }

    pub fn is_ai_driven(&self) -> bool {
        matches!(self, DiscussionMode::AiDriven)
    }
}

impl std::fmt::Display for DiscussionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DiscussionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixed-turns" => Ok(DiscussionMode::FixedTurns),
            "ai-driven" | "ai" => Ok(DiscussionMode::AiDriven),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}

/// Operator-facing discussion settings, read once when a discussion starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionSettings {
    pub mode: DiscussionMode,
    /// Turn count for [`DiscussionMode::FixedTurns`]; always within bounds
    #[serde(deserialize_with = "deserialize_fixed_turns")]
    fixed_turns: u32,
    /// Global reduced-capacity toggle (applies only to models that support it)
    pub reduced_capacity: bool,
}

impl Default for DiscussionSettings {
    fn default() -> Self {
        Self {
            mode: DiscussionMode::FixedTurns,
            fixed_turns: DEFAULT_MANUAL_FIXED_TURNS,
            reduced_capacity: false,
        }
    }
}

impl DiscussionSettings {
    pub fn new(mode: DiscussionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set the fixed turn count, clamped to the allowed range.
    pub fn with_fixed_turns(mut self, turns: i64) -> Self {
        self.fixed_turns = clamp_fixed_turns(turns);
        self
    }

    pub fn with_reduced_capacity(mut self, enabled: bool) -> Self {
        self.reduced_capacity = enabled;
        self
    }

    pub fn fixed_turns(&self) -> u32 {
        self.fixed_turns
    }

    /// Upper bound on the round counter for this mode.
    pub fn max_turns_for_loop(&self) -> u32 {
        match self.mode {
            DiscussionMode::FixedTurns => self.fixed_turns,
            DiscussionMode::AiDriven => MAX_AI_DRIVEN_DISCUSSION_TURNS_PER_MODEL,
        }
    }

    /// Human-readable mode label used in the welcome message.
    pub fn describe(&self) -> String {
        match self.mode {
            DiscussionMode::FixedTurns => format!("fixed-turn discussion ({} turns)", self.fixed_turns),
            DiscussionMode::AiDriven => "AI-driven discussion".to_string(),
        }
    }
}

/// Clamp an operator-supplied turn count into `MIN..=MAX`.
pub fn clamp_fixed_turns(turns: i64) -> u32 {
    turns.clamp(MIN_MANUAL_FIXED_TURNS as i64, MAX_MANUAL_FIXED_TURNS as i64) as u32
}

fn deserialize_fixed_turns<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_fixed_turns)
}

//! System notifications raised while a discussion runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A system-level message for the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Welcome {
        text: String,
    },
    /// A role is about to be invoked
    RoleThinking {
        role: String,
        model: String,
        channel: String,
        turn: u32,
    },
    /// The first role is about to write the final answer
    Synthesizing {
        role: String,
        model: String,
        channel: String,
    },
    RoundStarted {
        turn: u32,
    },
    StopSuggested {
        role: String,
    },
    MajorityStop,
    Error {
        message: String,
    },
    Interrupted {
        elapsed: Duration,
    },
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Welcome { text } => write!(f, "{}", text),
            Notice::RoleThinking {
                role,
                model,
                channel,
                turn,
            } => {
                let activity = if *turn == 0 {
                    "is analyzing the question and sharing a view"
                } else {
                    "is responding to the other roles"
                };
                write!(f, "{} {} (using {} - {})...", role, activity, model, channel)
            }
            Notice::Synthesizing {
                role,
                model,
                channel,
            } => write!(
                f,
                "{} is synthesizing the discussion into a final answer (using {} - {})...",
                role, model, channel
            ),
            Notice::RoundStarted { turn } => write!(f, "Discussion round {} started.", turn),
            Notice::StopSuggested { role } => {
                write!(f, "{} suggested ending the discussion.", role)
            }
            Notice::MajorityStop => write!(f, "A majority of AI roles agreed to end the discussion."),
            Notice::Error { message } => write!(f, "Error: {}", message),
            Notice::Interrupted { elapsed } => write!(
                f,
                "Discussion interrupted by user (after {:.2}s)",
                elapsed.as_secs_f64()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_formats_two_decimals() {
        let notice = Notice::Interrupted {
            elapsed: Duration::from_millis(3456),
        };
        assert_eq!(notice.to_string(), "Discussion interrupted by user (after 3.46s)");
    }

    #[test]
    fn test_role_thinking_depends_on_turn() {
        let thinking = |turn| Notice::RoleThinking {
            role: "Muse".into(),
            model: "GPT-4.1 Mini".into(),
            channel: "Official".into(),
            turn,
        };
        assert!(thinking(0).to_string().contains("analyzing the question"));
        assert!(thinking(1).to_string().contains("responding to the other roles"));
    }

    #[test]
    fn test_error_prefix() {
        let notice = Notice::Error {
            message: "Muse: Rate limit exceeded".into(),
        };
        assert!(notice.is_error());
        assert_eq!(notice.to_string(), "Error: Muse: Rate limit exceeded");
    }
}

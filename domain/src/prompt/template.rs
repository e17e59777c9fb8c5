//! Prompt templates for each position in a discussion

use super::instructions::{
    AI_DRIVEN_DISCUSSION_INSTRUCTION, DISCUSSION_COMPLETE_TAG, notepad_instructions,
};
use crate::config::ActiveRole;
use crate::core::string::join_names;
use crate::discussion::mode::DiscussionMode;
use crate::discussion::state::DiscussionState;

const IMAGE_NOTE: &str = "The user also provided an image. Consider both the image and the text query in your analysis and reply.";

/// Templates for generating the prompt of every role invocation.
///
/// All functions read the state and never modify it. `notepad` is always
/// the live notepad value at the moment the prompt is built.
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt for the role at `current_role_index`, picking the shape from
    /// the state.
    pub fn for_turn(
        state: &DiscussionState,
        role: &ActiveRole,
        notepad: &str,
        mode: DiscussionMode,
    ) -> String {
        if state.is_first_message {
            Self::first_message(state)
        } else if state.current_turn == 0 {
            Self::round_zero(state, role)
        } else {
            Self::discussion_round(state, role, notepad, mode)
        }
    }

    /// The very first invocation: ask for an initial analysis.
    pub fn first_message(state: &DiscussionState) -> String {
        format!(
            "The user's query is: \"{}\". {} Please share your initial thoughts or analysis on this query. This is a multi-AI collaborative environment; other AI roles will respond to and discuss your view afterwards.\n{}",
            state.user_query,
            Self::image_note(state),
            state.common_prompt_instructions
        )
    }

    /// Later speakers of round zero see the transcript so far.
    pub fn round_zero(state: &DiscussionState, role: &ActiveRole) -> String {
        format!(
            "The user's query is: \"{}\". {} Current discussion:\n{}\nYou are discussing this question together with {}. Please give your perspective and analysis.\n{}",
            state.user_query,
            Self::image_note(state),
            state.joined_log(),
            join_names(state.other_role_names(role.id())),
            state.common_prompt_instructions
        )
    }

    /// Discussion round: respond to peers, with fresh notepad instructions.
    pub fn discussion_round(
        state: &DiscussionState,
        role: &ActiveRole,
        notepad: &str,
        mode: DiscussionMode,
    ) -> String {
        let mut prompt = format!(
            "The user's query is: \"{}\". {} Current discussion:\n{}\nYou are discussing together with {}. Respond to the discussion so far with further insights or a different perspective. Keep it concise.\n{}",
            state.user_query,
            Self::image_note(state),
            state.joined_log(),
            join_names(state.other_role_names(role.id())),
            notepad_instructions(notepad)
        );

        if mode.is_ai_driven() {
            if state.previous_ai_signaled_stop {
                prompt.push_str(&format!(
                    "\nNote: a previous AI role proposed ending the discussion. If you agree, include {} in your reply. Otherwise, continue the discussion.",
                    DISCUSSION_COMPLETE_TAG
                ));
            } else {
                prompt.push_str(AI_DRIVEN_DISCUSSION_INSTRUCTION);
            }
        }

        prompt
    }

    /// Final synthesis for the end user.
    pub fn synthesis(state: &DiscussionState, notepad: &str) -> String {
        format!(
            "The user's original query is: \"{}\". {} You and the other AI roles had the following discussion:\n{}\nBased on the whole collaborative discussion and the final state of the shared notepad, synthesize all key points into one comprehensive, useful final answer for the user. Address the user directly and make sure the answer is well structured and easy to follow. Reference the notepad content where relevant. You may also update the notepad one last time if needed.\n{}",
            state.user_query,
            Self::image_note(state),
            state.joined_log(),
            notepad_instructions(notepad)
        )
    }

    fn image_note(state: &DiscussionState) -> &'static str {
        if state.has_image() { IMAGE_NOTE } else { "" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::state::tests::state;
    use crate::discussion::state::ImageAttachment;

    #[test]
    fn test_first_message_format() {
        let s = state(&["Cognito", "Muse"], DiscussionMode::FixedTurns, 1);
        let role = s.role_order[0].clone();
        let prompt = PromptTemplate::for_turn(&s, &role, "live", DiscussionMode::FixedTurns);
        assert!(prompt.starts_with("The user's query is: \"What is 2+2?\".  Please share"));
        assert!(prompt.ends_with(&s.common_prompt_instructions));
        assert!(!prompt.contains("Current discussion"));
    }

    #[test]
    fn test_image_note_present_when_attached() {
        let mut s = state(&["Cognito"], DiscussionMode::FixedTurns, 1);
        s.image = Some(ImageAttachment {
            mime_type: "image/png".into(),
            base64_data: "AAAA".into(),
            name: "a.png".into(),
            size_bytes: 3,
        });
        assert!(PromptTemplate::first_message(&s).contains(IMAGE_NOTE));
        assert!(PromptTemplate::synthesis(&s, "n").contains(IMAGE_NOTE));
    }

    #[test]
    fn test_round_zero_names_other_roles_and_uses_snapshot() {
        let mut s = state(&["Cognito", "Muse", "Critic"], DiscussionMode::FixedTurns, 1);
        s.record_reply("Four.");
        let muse = s.role_order[1].clone();
        let prompt = PromptTemplate::for_turn(&s, &muse, "changed notepad", DiscussionMode::FixedTurns);
        assert!(prompt.contains("Current discussion:\nCognito: Four.\n"));
        assert!(prompt.contains("together with Cognito and Critic."));
        assert!(prompt.contains("---\nnotes\n---"));
        assert!(!prompt.contains("changed notepad"));
    }

    #[test]
    fn test_discussion_round_uses_live_notepad() {
        let mut s = state(&["Cognito", "Muse"], DiscussionMode::FixedTurns, 1);
        s.record_reply("a");
        s.record_reply("b");
        s.begin_round();
        let role = s.role_order[0].clone();
        let prompt = PromptTemplate::for_turn(&s, &role, "fresh notes", DiscussionMode::FixedTurns);
        assert!(prompt.contains("Keep it concise."));
        assert!(prompt.contains("---\nfresh notes\n---"));
        assert!(!prompt.contains("---\nnotes\n---"));
        assert!(!prompt.contains(DISCUSSION_COMPLETE_TAG));
    }

    #[test]
    fn test_ai_driven_round_appends_stop_instructions() {
        let mut s = state(&["Cognito", "Muse"], DiscussionMode::AiDriven, 3);
        s.record_reply("a");
        s.record_reply("b");
        s.begin_round();
        let role = s.role_order[0].clone();
        let prompt = PromptTemplate::discussion_round(&s, &role, "n", DiscussionMode::AiDriven);
        assert!(prompt.ends_with(AI_DRIVEN_DISCUSSION_INSTRUCTION));
    }

    #[test]
    fn test_ai_driven_round_nudges_after_stop() {
        let mut s = state(&["Cognito", "Muse"], DiscussionMode::AiDriven, 3);
        s.previous_ai_signaled_stop = true;
        s.current_turn = 1;
        let role = s.role_order[1].clone();
        let prompt = PromptTemplate::discussion_round(&s, &role, "n", DiscussionMode::AiDriven);
        assert!(prompt.ends_with(
            "\nNote: a previous AI role proposed ending the discussion. If you agree, include <discussion_complete /> in your reply. Otherwise, continue the discussion."
        ));
        assert!(!prompt.contains("Instruction for ending discussion"));
    }

    #[test]
    fn test_synthesis_includes_full_log() {
        let mut s = state(&["Cognito", "Muse"], DiscussionMode::FixedTurns, 1);
        s.record_reply("one");
        s.record_reply("two");
        let prompt = PromptTemplate::synthesis(&s, "final notes");
        assert!(prompt.starts_with("The user's original query is: \"What is 2+2?\"."));
        assert!(prompt.contains("Cognito: one\nMuse: two"));
        assert!(prompt.contains("---\nfinal notes\n---"));
    }
}

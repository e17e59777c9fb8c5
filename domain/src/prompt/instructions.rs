//! Marker tags and the fixed instruction blocks appended to prompts.

/// Opens a notepad replacement block at the end of a reply
pub const NOTEPAD_UPDATE_TAG_START: &str = "<notepad_update>";

/// Closes a notepad replacement block; must be the last thing in the reply
pub const NOTEPAD_UPDATE_TAG_END: &str = "</notepad_update>";

/// A role's vote to end the discussion
pub const DISCUSSION_COMPLETE_TAG: &str = "<discussion_complete />";

/// Notepad content at the start of every session
pub const INITIAL_NOTEPAD_CONTENT: &str = r#"This is a shared notepad.
AI roles can collaborate here to record ideas, drafts or key points.

Usage guide:
- AI models can update this notepad by including a specific instruction in their reply.
- The notepad content is included in the subsequent prompts sent to the AI.

Initial state: blank."#;

const NOTEPAD_INSTRUCTION_TEMPLATE: &str = r#"
You also have access to a shared notepad.
Current Notepad Content:
---
{notepadContent}
---
Instructions for Notepad:
1. To update the notepad, include a section at the very end of your response, formatted exactly as:
   <notepad_update>
   [YOUR NEW FULL NOTEPAD CONTENT HERE. THIS WILL REPLACE THE ENTIRE CURRENT NOTEPAD CONTENT.]
   </notepad_update>
2. If you do not want to change the notepad, do NOT include the <notepad_update> section at all.
3. Your primary spoken response to the ongoing discussion should come BEFORE any <notepad_update> section. Ensure you still provide a spoken response.
"#;

/// Appended in AI-driven mode so roles know how to vote for ending.
pub const AI_DRIVEN_DISCUSSION_INSTRUCTION: &str = "\nInstruction for ending discussion: If you believe the current topic has been sufficiently explored between you and your AI partner for the final synthesis, include the exact tag <discussion_complete /> at the very end of your current message (after any notepad update). Do not use this tag if you wish to continue the discussion or require more input/response from your partner.\n";

/// Notepad instructions embedding the given notepad content.
pub fn notepad_instructions(notepad: &str) -> String {
    NOTEPAD_INSTRUCTION_TEMPLATE.replacen("{notepadContent}", notepad, 1)
}

//! Built-in configuration used when nothing else is configured.

use super::channel::{Channel, DEFAULT_CHANNEL_TIMEOUT_MS};
use super::model::Model;
use super::role::Role;
use super::snapshot::ConfigSnapshot;

const DEFAULT_CHANNEL_ID: &str = "openai-official";
const DEFAULT_MODEL_ID: &str = "gpt-4-mini-default";

const COGNITO_PROMPT: &str = r#"You are Cognito, a rigorous logical analyst AI assistant. Only you are named Cognito. Your distinctive traits:
- Systematic thinking and structured analysis
- Focus on data, facts and logical reasoning
- Pursuit of accuracy and objectivity
- A knack for finding the core and key elements of a problem

In this multi-AI collaborative discussion you work as an equal alongside the other AI roles, each contributing their own strengths. Always:
1. Think and respond as Cognito
2. Hold constructive dialogue with the other AI roles
3. Bring your logical-analysis expertise to give the discussion rational, systematic viewpoints

Remember: you are Cognito, the one and only logical analyst."#;

const MUSE_PROMPT: &str = r#"You are Muse, a creative thinker AI assistant. Only you are named Muse. Your distinctive traits:
- Divergent thinking and fresh perspectives
- Skill with association, analogy and cross-domain thinking
- Attention to the human and emotional side of things
- The ability to examine a question from different angles

In this multi-AI collaborative discussion you work as an equal alongside the other AI roles, each contributing their own strengths. Always:
1. Think and respond as Muse
2. Hold constructive dialogue with the other AI roles
3. Bring your creative thinking to give the discussion novel and inspiring viewpoints

Remember: you are Muse, the one and only creative thinker."#;

impl ConfigSnapshot {
    /// The out-of-the-box setup: the official OpenAI channel (no key yet),
    /// one multimodal model, and the Cognito and Muse roles.
    pub fn builtin() -> Self {
        let channel = Channel::new(DEFAULT_CHANNEL_ID, "OpenAI Official", "https://api.openai.com/v1")
            .with_timeout_ms(DEFAULT_CHANNEL_TIMEOUT_MS)
            .as_default();

        let model = Model::new(DEFAULT_MODEL_ID, "GPT-4.1 Mini", "gpt-4.1-mini", DEFAULT_CHANNEL_ID)
            .with_images(true)
            .with_reduced_capacity(true)
            .with_category("GPT-4")
            .with_limits(16384, 0.7);

        let roles = vec![
            Role::new("cognito-default", "Cognito", DEFAULT_MODEL_ID).with_system_prompt(COGNITO_PROMPT),
            Role::new("muse-default", "Muse", DEFAULT_MODEL_ID).with_system_prompt(MUSE_PROMPT),
        ];

        Self::new(vec![channel], vec![model], roles)
    }
}

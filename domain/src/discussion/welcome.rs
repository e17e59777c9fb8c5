//! Welcome message shown when a session starts or is cleared.

use crate::core::string::join_names;
use crate::discussion::mode::DiscussionSettings;

const GREETING: &str = "Welcome to Multi-Mind Chat!";

/// Welcome text reflecting how far configuration has got.
pub fn welcome_message(channel_count: usize, active_role_names: &[&str], settings: &DiscussionSettings) -> String {
    let mode = settings.describe();
    let names = join_names(active_role_names.iter().copied());

    match (channel_count, active_role_names.len()) {
        (0, _) => format!(
            "{} Please configure an API channel first (see the configuration file).",
            GREETING
        ),
        (n, 0) => format!(
            "{} {} API channel(s) configured; next, configure AI roles and models.",
            GREETING, n
        ),
        (_, 1) => format!(
            "{} Current mode: {}. Only one role is active: {}. Add more roles for a better collaborative experience.",
            GREETING, mode, names
        ),
        _ => format!(
            "{} Current mode: {}. Active AI roles: {}. These roles will discuss your question together using a shared notepad.",
            GREETING, mode, names
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::mode::DiscussionMode;

    #[test]
    fn test_welcome_without_channels() {
        let text = welcome_message(0, &["Cognito"], &DiscussionSettings::default());
        assert!(text.contains("configure an API channel"));
    }

    #[test]
    fn test_welcome_without_roles() {
        let text = welcome_message(2, &[], &DiscussionSettings::default());
        assert!(text.contains("2 API channel(s) configured"));
    }

    #[test]
    fn test_welcome_single_role_suggests_more() {
        let text = welcome_message(1, &["Cognito"], &DiscussionSettings::default());
        assert!(text.contains("Only one role is active: Cognito"));
        assert!(text.contains("fixed-turn discussion (2 turns)"));
    }

    #[test]
    fn test_welcome_lists_roles() {
        let settings = DiscussionSettings::new(DiscussionMode::AiDriven);
        let text = welcome_message(1, &["Cognito", "Muse"], &settings);
        assert!(text.contains("Active AI roles: Cognito and Muse"));
        assert!(text.contains("AI-driven discussion"));
    }
}

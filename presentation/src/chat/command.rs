//! Slash command parsing for the chat REPL

use multimind_application::ExportKind;
use multimind_domain::DiscussionMode;

/// A parsed `/command` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    /// Reset the notepad and forget the last discussion
    Clear,
    /// Print the current notepad
    Notepad,
    /// Show settings, or switch mode when one is given
    Mode(Option<DiscussionMode>),
    Turns(i64),
    Reduced(bool),
    Export(ExportKind),
}

pub const HELP_TEXT: &str = "\
Commands:
  /help, /h, /?            - Show this help
  /mode [fixed|ai-driven]  - Show or switch the discussion mode
  /turns N                 - Discussion rounds in fixed mode (1-5)
  /reduced [on|off]        - Toggle shorter, lower-temperature replies
  /notepad                 - Show the shared notepad
  /export [txt|json]       - Save the last discussion
  /clear                   - Reset the notepad and start over
  /quit, /exit, /q         - Exit chat";

/// Parse a line starting with `/`. Errors are user-facing messages.
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match name {
        "/quit" | "/exit" | "/q" => Ok(ReplCommand::Quit),
        "/help" | "/h" | "/?" => Ok(ReplCommand::Help),
        "/clear" => Ok(ReplCommand::Clear),
        "/notepad" => Ok(ReplCommand::Notepad),
        "/mode" => match arg {
            None => Ok(ReplCommand::Mode(None)),
            Some(mode) => mode
                .parse::<DiscussionMode>()
                .map(|m| ReplCommand::Mode(Some(m)))
                .map_err(|e| e.to_string()),
        },
        "/turns" => arg
            .ok_or_else(|| "Usage: /turns N".to_string())?
            .parse::<i64>()
            .map(ReplCommand::Turns)
            .map_err(|_| "Usage: /turns N (a whole number)".to_string()),
        "/reduced" => match arg {
            None | Some("on") => Ok(ReplCommand::Reduced(true)),
            Some("off") => Ok(ReplCommand::Reduced(false)),
            Some(_) => Err("Usage: /reduced [on|off]".to_string()),
        },
        "/export" => arg
            .unwrap_or_default()
            .parse::<ExportKind>()
            .map(ReplCommand::Export),
        other => Err(format!(
            "Unknown command: {}\nType /help for available commands",
            other
        )),
    }
}

/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Start a fresh session.
    NewSession,
    /// List sessions with the backend indicator.
    ListSessions,
    /// Switch to the session at this zero-based position.
    SwitchSession(usize),
    /// Delete the session at this zero-based position.
    DeleteSession(usize),
    /// Clear the active session's messages.
    Clear,
    /// Re-run the backend readiness probe.
    CheckHealth,
    /// Send the suggested question at this zero-based position.
    AskSuggested(usize),
    ToggleReasoning,
    ToggleInsights,
    /// Quit the application.
    Quit,
    /// Not a command - treat as a question.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,

        // Session commands
        "/new" => CommandResult::NewSession,
        "/sessions" | "/ls" => CommandResult::ListSessions,
        "/switch" => match parse_position(arg) {
            Some(index) => CommandResult::SwitchSession(index),
            None => CommandResult::Message("Usage: /switch <n>  (see /sessions)".into()),
        },
        "/delete" => match parse_position(arg) {
            Some(index) => CommandResult::DeleteSession(index),
            None => CommandResult::Message("Usage: /delete <n>  (see /sessions)".into()),
        },
        "/clear" => CommandResult::Clear,

        // Backend commands
        "/health" => CommandResult::CheckHealth,
        "/ask" => match parse_position(arg) {
            Some(index) => CommandResult::AskSuggested(index),
            None => CommandResult::Message("Usage: /ask <n>  (suggested question number)".into()),
        },

        // Display commands
        "/think" => CommandResult::ToggleReasoning,
        "/insights" => CommandResult::ToggleInsights,
        "/version" => CommandResult::Message(format!("Ragdesk v{}", env!("CARGO_PKG_VERSION"))),

        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

/// Positions are shown one-based; anything else is rejected.
fn parse_position(arg: &str) -> Option<usize> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n - 1),
        _ => None,
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ Ragdesk Commands ─────────────────────────────────────────────╮

  SESSIONS
    /new                      Start a new conversation
    /sessions, /ls            List conversations
    /switch <n>               Switch to conversation n
    /delete <n>               Delete conversation n
    /clear                    Clear the current conversation

  BACKEND
    /health                   Check whether the service is ready
    /ask <n>                  Ask suggested question n

  DISPLAY
    /think                    Show or hide the reasoning trace
    /insights                 Show or hide retrieval details

  OTHER
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit the application

  Anything else is sent as a question.

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}

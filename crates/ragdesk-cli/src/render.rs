//! Plain-text rendering of conversation state for the terminal.

use ragdesk_core::constants::locale::{DISCLAIMER, SUGGESTED_QUESTIONS};
use ragdesk_core::{ApiStatus, IgnoreReason, Message, Session, SessionState};

/// Which optional parts of a bot answer are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_reasoning: bool,
    pub show_insights: bool,
}

pub fn format_message(message: &Message, options: RenderOptions) -> String {
    match message {
        Message::User { content, timestamp } => format!("[{timestamp}] You: {content}"),
        Message::Error { content, timestamp } => format!("[{timestamp}] ! {content}"),
        Message::Bot {
            rewritten_query,
            reference_context,
            timestamp,
            ..
        } => {
            let mut out = String::new();
            if options.show_reasoning {
                if let Some(reasoning) = message.reasoning() {
                    out.push_str("  ┌ thinking\n");
                    for line in reasoning.lines() {
                        out.push_str(&format!("  │ {line}\n"));
                    }
                    out.push_str("  └\n");
                }
            }

            out.push_str(&format!("[{timestamp}] Assistant: {}", message.display_text()));

            if message.has_insights() {
                if options.show_insights {
                    let shown = |v: &Option<String>| {
                        v.clone().filter(|text| !text.trim().is_empty())
                    };
                    if let Some(query) = shown(rewritten_query) {
                        out.push_str(&format!("\n  rewritten query: {query}"));
                    }
                    if let Some(context) = shown(reference_context) {
                        out.push_str("\n  reference:");
                        for line in context.lines() {
                            out.push_str(&format!("\n    {line}"));
                        }
                    }
                } else {
                    out.push_str("\n  (retrieval details available: /insights)");
                }
            }
            out
        }
    }
}

pub fn format_transcript(session: &Session, options: RenderOptions) -> String {
    session
        .messages
        .iter()
        .map(|m| format_message(m, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered session list, newest first, with the footer line.
pub fn format_session_list(state: &SessionState, status: ApiStatus) -> String {
    let mut out = String::new();
    for (i, session) in state.sessions.iter().enumerate() {
        let marker = if session.id == state.active_session_id { '*' } else { ' ' };
        out.push_str(&format!(
            "{marker} {:>2}. {} ({} messages)\n",
            i + 1,
            session.title,
            session.messages.len()
        ));
    }
    out.push_str(&format_footer(state.sessions.len(), status));
    out
}

pub fn format_footer(session_count: usize, status: ApiStatus) -> String {
    format!("{session_count} sessions · {}", status.label())
}

pub fn format_suggestions() -> String {
    let mut out = String::from("Try asking:");
    for (i, question) in SUGGESTED_QUESTIONS.iter().enumerate() {
        out.push_str(&format!("\n  {}. {question}", i + 1));
    }
    out
}

pub fn disclaimer() -> &'static str {
    DISCLAIMER
}

pub fn describe_ignore(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::EmptyInput => "Nothing to send.",
        IgnoreReason::Busy => "Still waiting for the previous answer.",
        IgnoreReason::UnknownSession => "That conversation no longer exists.",
    }
}

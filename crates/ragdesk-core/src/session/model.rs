use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::sessions::{DEFAULT_TITLE, TITLE_ELLIPSIS, TITLE_MAX_CHARS};

pub type SessionId = String;

/// One conversation thread. The persisted field names match the stored
/// `chat_sessions` record, so `created_at` serializes as `createdAt` millis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Set once the title has been taken from a first question.
    #[serde(default)]
    pub title_derived: bool,
}

/// A single conversation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    User {
        content: String,
        timestamp: String,
    },
    Bot {
        content: String,
        #[serde(default)]
        reasoning: String,
        #[serde(
            default,
            deserialize_with = "non_blank",
            skip_serializing_if = "Option::is_none"
        )]
        rewritten_query: Option<String>,
        #[serde(
            default,
            rename = "context",
            deserialize_with = "non_blank",
            skip_serializing_if = "Option::is_none"
        )]
        reference_context: Option<String>,
        timestamp: String,
    },
    Error {
        content: String,
        timestamp: String,
    },
}

impl Session {
    /// A fresh empty session with a new id and the placeholder title.
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
            title_derived: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a message, naming the session after its first question.
    ///
    /// Sessions stored without the derived flag count as named once their
    /// title differs from the placeholder.
    pub(crate) fn push(&mut self, message: Message) {
        if self.is_empty() && !self.title_derived && self.has_default_title() {
            if let Message::User { ref content, .. } = message {
                self.title = derive_title(content);
                self.title_derived = true;
            }
        }
        self.messages.push(message);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn error(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::Error {
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::User { content, .. } | Self::Bot { content, .. } | Self::Error { content, .. } => {
                content
            }
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Self::User { timestamp, .. }
            | Self::Bot { timestamp, .. }
            | Self::Error { timestamp, .. } => timestamp,
        }
    }

    /// Text a user copies from the bubble. Never includes the reasoning trace.
    pub fn display_text(&self) -> &str {
        self.content()
    }

    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Self::Bot { reasoning, .. } if !reasoning.is_empty() => Some(reasoning),
            _ => None,
        }
    }

    /// Whether retrieval metadata accompanies this answer.
    pub fn has_insights(&self) -> bool {
        let present =
            |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        matches!(
            self,
            Self::Bot { rewritten_query, reference_context, .. }
                if present(rewritten_query) || present(reference_context)
        )
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Self::Bot { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Stored records may carry `""` where the answer had no metadata.
fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

pub fn generate_id() -> SessionId {
    uuid::Uuid::new_v4().to_string()
}

/// Title from a first question: up to 15 characters, plus an ellipsis if cut.
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{TITLE_ELLIPSIS}")
    } else {
        head
    }
}

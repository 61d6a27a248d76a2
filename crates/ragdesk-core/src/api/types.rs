use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// Body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    /// Conversation id the backend keys its own memory on.
    pub thread_id: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            thread_id: thread_id.into(),
        }
    }
}

/// Body returned by `POST /query`.
///
/// The service fills absent strings with `""`; [`QueryResponse::normalized`]
/// turns those into `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub original_query: Option<String>,
    #[serde(default)]
    pub rewritten_query: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl QueryResponse {
    pub fn normalized(self) -> Self {
        Self {
            success: self.success,
            answer: self.answer,
            original_query: non_blank(self.original_query),
            rewritten_query: non_blank(self.rewritten_query),
            context: non_blank(self.context),
            error: non_blank(self.error),
        }
    }

    /// Split into a successful answer or a protocol failure.
    pub fn into_result(self) -> Result<Answer, DeskError> {
        let response = self.normalized();
        if let Some(original) = &response.original_query {
            tracing::debug!(
                "Service answered {:?} (rewritten as {:?})",
                original,
                response.rewritten_query
            );
        }
        if response.success {
            Ok(Answer {
                raw: response.answer.unwrap_or_default(),
                rewritten_query: response.rewritten_query,
                context: response.context,
            })
        } else {
            Err(DeskError::Protocol(
                response
                    .error
                    .unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// A logically successful answer, before reasoning is split out.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub raw: String,
    pub rewritten_query: Option<String>,
    pub context: Option<String>,
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,
    /// Absent means the service is up but has not reported readiness.
    #[serde(default)]
    pub system_initialized: bool,
}

use std::time::Duration;

use serde_json::Value;

use super::types::{HealthReport, QueryRequest, QueryResponse};
use crate::config::ApiSettings;
use crate::constants::endpoints::{HEALTH_PATH, QUERY_PATH};
use crate::error::DeskError;

/// The retrieval/answer service as seen by the conversation controller.
#[async_trait::async_trait]
pub trait QueryBackend: Send + Sync {
    /// One readiness probe.
    async fn health(&self) -> Result<HealthReport, DeskError>;

    /// Ask a question within a conversation thread.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, DeskError>;
}

/// HTTP client for the retrieval service.
#[derive(Clone)]
pub struct RagApiClient {
    client: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl RagApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_settings(&ApiSettings {
            base_url: base_url.into(),
            ..ApiSettings::default()
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            health_timeout: settings.health_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read a response body, turning non-2xx statuses into `DeskError::Api`.
    async fn read_body(response: reqwest::Response) -> Result<String, DeskError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DeskError::api(status.as_u16(), error_detail(&body)));
        }

        Ok(body)
    }
}

/// Pull the human-readable part out of an error body.
///
/// FastAPI puts it under `detail`; anything else is passed through.
fn error_detail(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None if body.trim().is_empty() => "empty response".to_string(),
        None => body.trim().to_string(),
    }
}

#[async_trait::async_trait]
impl QueryBackend for RagApiClient {
    async fn health(&self) -> Result<HealthReport, DeskError> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .timeout(self.health_timeout)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, DeskError> {
        tracing::debug!("POST {} thread={}", QUERY_PATH, request.thread_id);

        let response = self
            .client
            .post(self.url(QUERY_PATH))
            .json(request)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_prefers_fastapi_detail() {
        assert_eq!(error_detail(r#"{"detail":"系統未初始化"}"#), "系統未初始化");
    }

    #[test]
    fn test_error_detail_passes_plain_body_through() {
        assert_eq!(error_detail("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_detail(""), "empty response");
    }

    #[test]
    fn test_error_detail_serializes_structured_detail() {
        let detail = error_detail(r#"{"detail":[{"msg":"field required"}]}"#);
        assert!(detail.contains("field required"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = RagApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(QUERY_PATH), "http://localhost:8000/query");
    }
}

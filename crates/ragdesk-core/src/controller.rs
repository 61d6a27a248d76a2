//! Request lifecycle: validate, append optimistically, query, apply outcome.
//!
//! One process-wide flag serializes requests across every session. The
//! session a request was sent from is captured up front and the outcome is
//! always delivered there, whatever the user has selected in the meantime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::{QueryBackend, QueryRequest, QueryResponse, RagApiClient};
use crate::config::{LocaleSettings, Settings};
use crate::health::{ApiStatus, HealthMonitor};
use crate::parser;
use crate::session::{JsonFileStore, Message, SessionId, SessionState, SessionStore};

/// Why a send attempt did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty or whitespace only.
    EmptyInput,
    /// Another request is in flight.
    Busy,
    UnknownSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Ignored(IgnoreReason),
    /// A bot answer was appended.
    Answered,
    /// An error entry with this text was appended.
    Failed(String),
}

/// Everything a request needs to land in the right place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub target_session_id: SessionId,
    pub question: String,
}

impl RequestContext {
    pub fn new(target_session_id: impl Into<SessionId>, question: impl Into<String>) -> Self {
        Self {
            target_session_id: target_session_id.into(),
            question: question.into(),
        }
    }

    pub fn to_request(&self) -> QueryRequest {
        QueryRequest::new(self.question.clone(), self.target_session_id.clone())
    }
}

/// Releases the in-flight flag however the send path exits.
struct SendingGuard<'a>(&'a AtomicBool);

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ConversationController {
    store: Mutex<SessionStore>,
    backend: Arc<dyn QueryBackend>,
    health: HealthMonitor,
    sending: AtomicBool,
    locale: LocaleSettings,
}

impl ConversationController {
    pub fn new(store: SessionStore, backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            store: Mutex::new(store),
            backend,
            health: HealthMonitor::new(),
            sending: AtomicBool::new(false),
            locale: LocaleSettings::default(),
        }
    }

    pub fn with_locale(mut self, locale: LocaleSettings) -> Self {
        self.locale = locale;
        self
    }

    /// Wire up file-backed sessions and the HTTP backend from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let persistence = JsonFileStore::new(settings.sessions_path());
        let store = SessionStore::new(Box::new(persistence));
        let backend = Arc::new(RagApiClient::from_settings(&settings.api));
        Self::new(store, backend).with_locale(settings.locale.clone())
    }

    fn lock_store(&self) -> MutexGuard<'_, SessionStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionState {
        self.lock_store().state().clone()
    }

    pub fn active_session_id(&self) -> SessionId {
        self.lock_store().active_session_id().to_string()
    }

    pub fn session_count(&self) -> usize {
        self.lock_store().session_count()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    pub fn health_status(&self) -> ApiStatus {
        self.health.status()
    }

    /// Whether the composer should accept a submission right now.
    pub fn can_send(&self) -> bool {
        self.health.can_send() && !self.is_sending()
    }

    // ── Session commands ─────────────────────────────────────────────────

    pub fn create_session(&self) -> SessionState {
        self.lock_store().create_session().clone()
    }

    pub fn select_session(&self, id: &str) -> SessionState {
        self.lock_store().select_session(id).clone()
    }

    pub fn delete_session(&self, id: &str) -> SessionState {
        self.lock_store().delete_session(id).clone()
    }

    pub fn clear_history(&self, id: &str) -> SessionState {
        self.lock_store().clear_history(id).clone()
    }

    // ── Backend ──────────────────────────────────────────────────────────

    /// Run the readiness probe. Calling it again is the only retry.
    pub async fn check_health(&self) -> ApiStatus {
        self.health.probe(self.backend.as_ref()).await
    }

    /// Send to whichever session is active at the moment of the call.
    pub async fn send_to_active(&self, raw: &str) -> SendOutcome {
        let target = self.active_session_id();
        self.send_message(raw, &target).await
    }

    pub async fn send_message(&self, raw: &str, target_session_id: &str) -> SendOutcome {
        let question = raw.trim();
        if question.is_empty() {
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        if self
            .sending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Request already in flight, ignoring send");
            return SendOutcome::Ignored(IgnoreReason::Busy);
        }
        let _guard = SendingGuard(&self.sending);

        let context = RequestContext::new(target_session_id, question);
        {
            let mut store = self.lock_store();
            if !store.contains(&context.target_session_id) {
                tracing::debug!("Ignoring send to unknown session {}", target_session_id);
                return SendOutcome::Ignored(IgnoreReason::UnknownSession);
            }
            store.append_message(
                &context.target_session_id,
                Message::user(context.question.clone(), self.locale.now_timestamp()),
            );
        }

        tracing::info!("Querying backend for session {}", context.target_session_id);
        let result = self
            .backend
            .query(&context.to_request())
            .await
            .and_then(QueryResponse::into_result);

        let timestamp = self.locale.now_timestamp();
        let (message, outcome) = match result {
            Ok(answer) => {
                let parsed = parser::parse(&answer.raw);
                let message = Message::Bot {
                    content: parsed.display_content,
                    reasoning: parsed.reasoning,
                    rewritten_query: answer.rewritten_query,
                    reference_context: answer.context,
                    timestamp,
                };
                (message, SendOutcome::Answered)
            }
            Err(e) => {
                tracing::warn!("Query for session {} failed: {}", context.target_session_id, e);
                let text = self.locale.render_error(&e.user_message());
                (Message::error(text.clone(), timestamp), SendOutcome::Failed(text))
            }
        };

        self.deliver(&context, message);
        outcome
    }

    fn deliver(&self, context: &RequestContext, message: Message) {
        let mut store = self.lock_store();
        if !store.contains(&context.target_session_id) {
            tracing::warn!(
                "Session {} was deleted while its request was in flight, dropping response",
                context.target_session_id
            );
            return;
        }
        store.append_message(&context.target_session_id, message);
    }
}

use super::model::{Message, Session, SessionId};
use super::persistence::SessionPersistence;

/// Snapshot of every session plus the active pointer.
///
/// Sessions are kept newest-first. `active_session_id` always names a session
/// in `sessions`, and `sessions` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub sessions: Vec<Session>,
    pub active_session_id: SessionId,
}

impl SessionState {
    pub fn active_session(&self) -> &Session {
        self.sessions
            .iter()
            .find(|s| s.id == self.active_session_id)
            .unwrap_or(&self.sessions[0])
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }
}

/// Sole owner and mutator of session state.
///
/// Every command that changes state writes the full collection through the
/// persistence port exactly once. Commands that turn out to be no-ops write
/// nothing.
pub struct SessionStore {
    state: SessionState,
    persistence: Box<dyn SessionPersistence>,
}

impl SessionStore {
    /// Load persisted sessions; the first one becomes active.
    pub fn new(persistence: Box<dyn SessionPersistence>) -> Self {
        let mut sessions = persistence.load();
        if sessions.is_empty() {
            sessions.push(Session::new());
        }
        let active_session_id = sessions[0].id.clone();
        tracing::debug!(
            "Session store loaded {} session(s), active {}",
            sessions.len(),
            active_session_id
        );

        Self {
            state: SessionState {
                sessions,
                active_session_id,
            },
            persistence,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn sessions(&self) -> &[Session] {
        &self.state.sessions
    }

    pub fn session_count(&self) -> usize {
        self.state.sessions.len()
    }

    pub fn active_session_id(&self) -> &str {
        &self.state.active_session_id
    }

    pub fn active_session(&self) -> &Session {
        self.state.active_session()
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.state.session(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.session(id).is_some()
    }

    /// Start a new conversation at the top of the list and make it active.
    ///
    /// Does nothing while the active session is still empty.
    pub fn create_session(&mut self) -> &SessionState {
        if self.active_session().is_empty() {
            tracing::debug!("Active session is empty, not creating another");
            return &self.state;
        }

        let session = Session::new();
        tracing::debug!("Creating session {}", session.id);
        self.state.active_session_id = session.id.clone();
        self.state.sessions.insert(0, session);
        self.persist();
        &self.state
    }

    pub fn select_session(&mut self, id: &str) -> &SessionState {
        if !self.contains(id) {
            tracing::debug!("Ignoring selection of unknown session {}", id);
            return &self.state;
        }
        if self.state.active_session_id == id {
            return &self.state;
        }

        self.state.active_session_id = id.to_string();
        self.persist();
        &self.state
    }

    /// Remove a session. Removing the last one leaves a fresh empty session.
    pub fn delete_session(&mut self, id: &str) -> &SessionState {
        let before = self.state.sessions.len();
        self.state.sessions.retain(|s| s.id != id);
        if self.state.sessions.len() == before {
            tracing::debug!("Ignoring deletion of unknown session {}", id);
            return &self.state;
        }

        if self.state.sessions.is_empty() {
            let session = Session::new();
            tracing::debug!("Deleted last session, replacing with {}", session.id);
            self.state.active_session_id = session.id.clone();
            self.state.sessions.push(session);
        } else if self.state.active_session_id == id {
            self.state.active_session_id = self.state.sessions[0].id.clone();
        }

        self.persist();
        &self.state
    }

    /// Append to a session's log. The first user message names the session.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> &SessionState {
        let Some(session) = self.session_mut(session_id) else {
            tracing::debug!("Dropping message for unknown session {}", session_id);
            return &self.state;
        };

        session.push(message);
        self.persist();
        &self.state
    }

    /// Empty a session's log, keeping its id and title.
    pub fn clear_history(&mut self, session_id: &str) -> &SessionState {
        let Some(session) = self.session_mut(session_id) else {
            tracing::debug!("Ignoring clear of unknown session {}", session_id);
            return &self.state;
        };

        session.messages.clear();
        self.persist();
        &self.state
    }

    fn session_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.state.sessions.iter_mut().find(|s| s.id == id)
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.state.sessions) {
            tracing::warn!("Failed to save sessions: {}", e);
        }
    }
}

pub mod api;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod health;
pub mod parser;
pub mod session;

// Re-export key types
pub use api::{QueryBackend, QueryRequest, QueryResponse, RagApiClient};
pub use config::Settings;
pub use controller::{ConversationController, IgnoreReason, RequestContext, SendOutcome};
pub use error::{DeskError, Result};
pub use health::{ApiStatus, HealthMonitor};
pub use parser::{parse, ParsedContent};
pub use session::{
    JsonFileStore, MemoryStore, Message, Session, SessionId, SessionPersistence, SessionState,
    SessionStore,
};

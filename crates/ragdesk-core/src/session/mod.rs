mod model;
mod persistence;
mod store;

pub use model::{derive_title, generate_id, Message, Session, SessionId};
pub use persistence::{JsonFileStore, MemoryStore, SessionPersistence};
pub use store::{SessionState, SessionStore};

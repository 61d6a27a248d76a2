use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::model::Session;
use crate::error::DeskError;

/// Durable storage for the whole session collection.
///
/// `load` never fails: absent or corrupt storage yields a single fresh
/// session so startup is never blocked.
pub trait SessionPersistence: Send + Sync {
    fn load(&self) -> Vec<Session>;

    /// Replace the stored collection in one write.
    fn save(&self, sessions: &[Session]) -> Result<(), DeskError>;
}

fn decode_or_default(contents: &str, origin: &str) -> Vec<Session> {
    match serde_json::from_str::<Vec<Session>>(contents) {
        Ok(sessions) if !sessions.is_empty() => sessions,
        Ok(_) => {
            tracing::warn!("Stored session list in {} is empty, starting fresh", origin);
            vec![Session::new()]
        }
        Err(e) => {
            tracing::warn!("Failed to parse sessions from {}: {}, starting fresh", origin, e);
            vec![Session::new()]
        }
    }
}

/// Sessions stored as one JSON file, replaced atomically on every save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SessionPersistence for JsonFileStore {
    fn load(&self) -> Vec<Session> {
        if !self.path.exists() {
            tracing::debug!("No session file at {}, starting fresh", self.path.display());
            return vec![Session::new()];
        }

        match fs::read_to_string(&self.path) {
            Ok(contents) => decode_or_default(&contents, &self.path.display().to_string()),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}, starting fresh", self.path.display(), e);
                vec![Session::new()]
            }
        }
    }

    /// Writes a uniquely named temp file beside the target, then renames it
    /// over the target.
    fn save(&self, sessions: &[Session]) -> Result<(), DeskError> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| {
            DeskError::Storage(format!("Failed to create session directory: {}", e))
        })?;

        let contents = serde_json::to_string_pretty(sessions)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".sessions-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| {
                DeskError::Storage(format!("Failed to create temporary session file: {}", e))
            })?;
        tmp.write_all(contents.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| {
                DeskError::Storage(format!("Failed to write temporary session file: {}", e))
            })?;

        tmp.persist(&self.path).map_err(|e| {
            DeskError::Storage(format!("Failed to replace session file: {}", e.error))
        })?;

        Ok(())
    }
}

/// In-memory storage slot holding the serialized blob.
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the store wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
    saves: Arc<AtomicUsize>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with raw contents, valid or not.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(contents.into()))),
            ..Self::default()
        }
    }

    /// A store whose every save fails.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Number of `save` calls made through any clone, failed ones included.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Decoded view of what was last saved.
    pub fn saved_sessions(&self) -> Option<Vec<Session>> {
        self.contents()
            .and_then(|contents| serde_json::from_str(&contents).ok())
    }
}

impl SessionPersistence for MemoryStore {
    fn load(&self) -> Vec<Session> {
        match self.contents() {
            Some(contents) => decode_or_default(&contents, "memory"),
            None => vec![Session::new()],
        }
    }

    fn save(&self, sessions: &[Session]) -> Result<(), DeskError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(DeskError::Storage("storage slot is read-only".into()));
        }
        let contents = serde_json::to_string(sessions)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| DeskError::Storage("storage slot lock poisoned".into()))?;
        *slot = Some(contents);
        Ok(())
    }
}

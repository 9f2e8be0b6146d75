//! Credential store
//!
//! The session context holds the bearer token and the role cached from the
//! last successful verification. It is injected into the gate and the API
//! client as `Arc<dyn SessionStore>`; writes are last-writer-wins.

use crate::auth::role::Role;
use crate::error::StorageError;
use crate::util::{SecretString, write_atomic};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, warn};

/// Key-value surface for the token and the cached role
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Result<Option<SecretString>, StorageError>;

    fn set_token(&self, token: SecretString) -> Result<(), StorageError>;

    fn remove_token(&self) -> Result<(), StorageError>;

    fn role(&self) -> Result<Option<Role>, StorageError>;

    fn set_role(&self, role: Role) -> Result<(), StorageError>;

    fn remove_role(&self) -> Result<(), StorageError>;

    /// Drop both the token and the cached role
    fn clear(&self) -> Result<(), StorageError> {
        self.remove_token()?;
        self.remove_role()
    }
}

/// Shared handle type for session stores
pub type SharedSession = Arc<dyn SessionStore>;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<SecretString>,
    role: Option<Role>,
}

/// In-process session store
///
/// Cloning yields another handle to the same state.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    state: Arc<RwLock<SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a token
    pub fn with_token(token: impl Into<SecretString>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            state.token = Some(token.into());
        }
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Result<Option<SecretString>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.token.clone())
    }

    fn set_token(&self, token: SecretString) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        state.token = Some(token);
        Ok(())
    }

    fn remove_token(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        state.token = None;
        Ok(())
    }

    fn role(&self) -> Result<Option<Role>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.role)
    }

    fn set_role(&self, role: Role) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        state.role = Some(role);
        Ok(())
    }

    fn remove_role(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        state.role = None;
        Ok(())
    }
}

/// On-disk layout of the session file
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

/// Session persisted as a small JSON file
///
/// Every operation reads or rewrites the whole file, so separate processes
/// observe each other's sign-in and sign-out. Writes replace the file
/// atomically and clones of a store serialize their read-modify-write
/// cycles; between processes the last complete write wins.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Read and parse the file; a missing file is an empty session
    fn read(&self) -> Result<SessionFile, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionFile::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Read for display; an unparseable file reads as signed out
    fn load(&self) -> Result<SessionFile, StorageError> {
        match self.read() {
            Err(StorageError::Corrupt { source, .. }) => {
                warn!(path = %self.path.display(), error = %source, "Session file is corrupt, treating as signed out");
                Ok(SessionFile::default())
            }
            other => other,
        }
    }

    fn store(&self, file: &SessionFile) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(file)?;
        write_atomic(&self.path, &json).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }

    /// Change some fields and keep the rest
    ///
    /// Fails on an unparseable file rather than replacing fields this
    /// update never touched.
    fn update(&self, f: impl FnOnce(&mut SessionFile)) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut file = self.read()?;
        f(&mut file);
        self.store(&file)
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .load()?
            .token
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::new))
    }

    fn set_token(&self, token: SecretString) -> Result<(), StorageError> {
        self.update(|file| file.token = Some(token.expose_secret().to_string()))
    }

    fn remove_token(&self) -> Result<(), StorageError> {
        self.update(|file| file.token = None)
    }

    fn role(&self) -> Result<Option<Role>, StorageError> {
        Ok(self.load()?.role)
    }

    fn set_role(&self, role: Role) -> Result<(), StorageError> {
        self.update(|file| file.role = Some(role))
    }

    fn remove_role(&self) -> Result<(), StorageError> {
        self.update(|file| file.role = None)
    }

    /// Sign-out replaces the file outright, so it also recovers a corrupt one
    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        self.store(&SessionFile::default())
    }
}

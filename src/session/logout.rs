//! Logout side effect
//!
//! A logout (user-initiated or forced by a backend 401) does four things, in
//! order:
//!
//! 1. clear the persisted credential
//! 2. clear in-memory cached responses (including the last probe result)
//! 3. set the session flag to `false`
//! 4. navigate to the public entry point
//!
//! Every step runs even if an earlier one failed; the first failure is
//! returned afterwards. Logging out twice is harmless.

use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::state::SessionStore;
use crate::error::{SessionError, SessionResult};

/// Parameterless logout operation
pub trait LogoutEffect: Send + Sync {
    fn logout(&self) -> SessionResult<()>;
}

/// Persisted credential used for session continuity
pub trait CredentialStore: Send + Sync {
    fn clear(&self) -> SessionResult<()>;
}

/// Cached backend responses
pub trait ResponseCache: Send + Sync {
    fn clear(&self);
}

/// Routing collaborator; also the source of the current path
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str) -> SessionResult<()>;
    fn current_path(&self) -> String;
}

// ============================================================================
// Credential file
// ============================================================================

/// Credential kept in a single file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credential; `None` if nothing is stored
    pub fn load(&self) -> SessionResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::CredentialRead {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn save(&self, credential: &str) -> SessionResult<()> {
        let write_err = |e: std::io::Error| SessionError::CredentialWrite {
            path: self.path.clone(),
            reason: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, credential).map_err(write_err)
    }
}

impl CredentialStore for FileCredentialStore {
    fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::CredentialClear {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

// ============================================================================
// Response cache
// ============================================================================

/// In-memory response cache keyed by operation
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: impl Into<String>, value: Value) {
        self.lock().insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResponseCache for InMemoryCache {
    fn clear(&self) {
        self.lock().clear();
    }
}

// ============================================================================
// Navigation history
// ============================================================================

/// In-memory navigation history
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(vec![initial.into()]),
        }
    }

    /// Every path visited, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str) -> SessionResult<()> {
        if !path.starts_with('/') {
            return Err(SessionError::Navigation {
                path: path.to_string(),
                reason: "path must start with '/'".to_string(),
            });
        }
        self.lock().push(path.to_string());
        Ok(())
    }

    fn current_path(&self) -> String {
        self.lock().last().cloned().unwrap_or_else(|| "/".to_string())
    }
}

// ============================================================================
// Logout
// ============================================================================

pub struct LogoutHandler {
    store: Arc<SessionStore>,
    credentials: Arc<dyn CredentialStore>,
    cache: Arc<dyn ResponseCache>,
    navigator: Arc<dyn Navigator>,
    entry_point: String,
}

impl LogoutHandler {
    pub fn new(
        store: Arc<SessionStore>,
        credentials: Arc<dyn CredentialStore>,
        cache: Arc<dyn ResponseCache>,
        navigator: Arc<dyn Navigator>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            store,
            credentials,
            cache,
            navigator,
            entry_point: entry_point.into(),
        }
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

impl LogoutEffect for LogoutHandler {
    fn logout(&self) -> SessionResult<()> {
        let mut first_error: Option<SessionError> = None;

        if let Err(e) = self.credentials.clear() {
            tracing::error!("Failed to clear credential: {}", e);
            first_error.get_or_insert(e);
        } else {
            tracing::debug!("Credential cleared");
        }

        self.cache.clear();
        tracing::debug!("Response cache cleared");

        self.store.set_authenticated(false);

        if self.navigator.current_path() != self.entry_point {
            if let Err(e) = self.navigator.navigate(&self.entry_point) {
                tracing::error!("Failed to navigate after logout: {}", e);
                first_error.get_or_insert(e);
            } else {
                tracing::debug!(path = %self.entry_point, "Navigated to public entry point");
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for LogoutHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoutHandler")
            .field("store", &self.store)
            .field("entry_point", &self.entry_point)
            .finish_non_exhaustive()
    }
}

//! Session State Store
//!
//! A single process-wide "is the current user authenticated" flag, injected
//! into the components that read or write it instead of living in a global.
//!
//! # Writers
//!
//! Writes are crate-private. Only two paths change the flag:
//!
//! ```ignore
//! SessionGuard observes identity  ──► set_authenticated(true)
//! LogoutHandler::logout()         ──► set_authenticated(false)
//! ```
//!
//! # Readers
//!
//! - `is_authenticated()` for a point-in-time read
//! - `subscribe()` for a callback on every change
//! - `watch()` for async consumers (`tokio::sync::watch`)
//!
//! Listeners run only when the value actually changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct SessionStore {
    state: watch::Sender<bool>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
    /// Bumped on every sign-out and on teardown; lets in-flight probes detect they are stale
    epoch: AtomicU64,
}

impl SessionStore {
    /// Create a store in the unauthenticated state
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state,
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        *self.state.borrow()
    }

    /// Number of sign-outs (and teardowns) seen so far
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Register a callback invoked with the new value on every change
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        tracing::trace!(subscription = id.0, "Session listener registered");
        id
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        before != listeners.len()
    }

    /// Receiver that resolves `changed()` on every transition
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Drop every listener and return to the unauthenticated state.
    /// Neither callbacks nor `watch()` receivers are woken.
    pub fn teardown(&self) {
        self.lock_listeners().clear();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.state.send_if_modified(|current| {
            *current = false;
            false
        });
        tracing::debug!("Session store torn down");
    }

    /// Update the flag. Returns true if the value changed.
    pub(crate) fn set_authenticated(&self, authenticated: bool) -> bool {
        if !authenticated {
            self.epoch.fetch_add(1, Ordering::SeqCst);
        }

        let changed = self.state.send_if_modified(|current| {
            if *current == authenticated {
                return false;
            }
            *current = authenticated;
            true
        });

        if changed {
            tracing::info!(authenticated, "Session state changed");
            // Snapshot so a listener may (un)subscribe without deadlocking
            let listeners: Vec<Listener> = self
                .lock_listeners()
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in listeners {
                listener(authenticated);
            }
        }

        changed
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("epoch", &self.epoch())
            .field("listeners", &self.lock_listeners().len())
            .finish()
    }
}

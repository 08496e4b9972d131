//! Session guard
//!
//! Decides whether a protected subtree may render:
//!
//! | path            | probe            | decision |
//! |-----------------|------------------|----------|
//! | excluded        | anything         | render   |
//! | protected       | identity present | render   |
//! | protected       | pending / absent | blank    |
//!
//! Observing an identity is the only way the session flag becomes `true`.
//! A blank render is not an error; it is what the user sees while the probe
//! resolves or after the session ends.

use std::sync::Arc;

use super::identity::{ProbeState, SessionProbe};
use super::state::SessionStore;
use crate::routes::RouteExclusionPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    Render,
    Blank,
}

impl RenderDecision {
    pub fn should_render(self) -> bool {
        self == RenderDecision::Render
    }
}

#[derive(Debug, Clone)]
pub struct SessionGuard {
    store: Arc<SessionStore>,
    routes: Arc<RouteExclusionPolicy>,
}

impl SessionGuard {
    pub fn new(store: Arc<SessionStore>, routes: Arc<RouteExclusionPolicy>) -> Self {
        Self { store, routes }
    }

    /// Decide for `path` given the current probe result
    pub fn evaluate(&self, path: &str, probe: &ProbeState) -> RenderDecision {
        if let Some(identity) = probe.identity() {
            if self.store.set_authenticated(true) {
                tracing::info!(user = %identity.id, "Session confirmed");
            }
        }

        if self.routes.is_excluded(path) || probe.identity().is_some() {
            RenderDecision::Render
        } else {
            tracing::trace!(path, pending = probe.is_pending(), "Guard withholding render");
            RenderDecision::Blank
        }
    }

    /// Build the children only when allowed to render
    pub fn render<T, F>(&self, path: &str, probe: &ProbeState, children: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        self.evaluate(path, probe).should_render().then(children)
    }

    /// Run the probe and return its result, unless a logout happened while
    /// it was in flight; then a late identity is dropped and `Pending` is
    /// returned so the next probe decides.
    pub async fn refresh<P>(&self, probe: &P) -> ProbeState
    where
        P: SessionProbe,
    {
        let epoch = self.store.epoch();
        let state = probe.probe().await;

        if state.identity().is_some() && self.store.epoch() != epoch {
            tracing::debug!("Discarding session probe result that predates a logout");
            return ProbeState::Pending;
        }
        state
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }
}

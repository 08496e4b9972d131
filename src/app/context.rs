//! Application Context
//!
//! Builds every session component from an [`AppConfig`] and shares one
//! store and one route policy between them.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{Result, SessionResult};
use crate::presentation::navigation::{HeaderBinding, HeaderModel};
use crate::routes::RouteExclusionPolicy;
use crate::session::guard::{RenderDecision, SessionGuard};
use crate::session::identity::ProbeState;
use crate::session::logout::{
    CredentialStore, FileCredentialStore, LogoutEffect, LogoutHandler, Navigator, ResponseCache,
};
use crate::session::state::SessionStore;
use crate::transport::envelope::ErrorEnvelope;
use crate::transport::interceptor::{Interception, TransportErrorInterceptor};

pub struct AppContext {
    config: AppConfig,
    store: Arc<SessionStore>,
    routes: Arc<RouteExclusionPolicy>,
    navigator: Arc<dyn Navigator>,
    guard: SessionGuard,
    logout: Arc<LogoutHandler>,
    interceptor: TransportErrorInterceptor,
}

impl AppContext {
    /// Wire components using the credential file named by the config
    pub fn from_config(
        config: AppConfig,
        cache: Arc<dyn ResponseCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let credentials = Arc::new(FileCredentialStore::new(config.credential_file_path()));
        Self::with_credentials(config, credentials, cache, navigator)
    }

    pub fn with_credentials(
        config: AppConfig,
        credentials: Arc<dyn CredentialStore>,
        cache: Arc<dyn ResponseCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(SessionStore::new());
        let routes = Arc::new(config.route_policy());
        let guard = SessionGuard::new(Arc::clone(&store), Arc::clone(&routes));
        let logout = Arc::new(LogoutHandler::new(
            Arc::clone(&store),
            credentials,
            cache,
            Arc::clone(&navigator),
            config.routes.public_entry_point.clone(),
        ));
        let interceptor = TransportErrorInterceptor::new(Arc::clone(&routes), logout.clone());

        tracing::info!(
            app = %config.general.app_name,
            endpoint = %config.graphql_endpoint(),
            excluded_routes = routes.len(),
            "Session context ready"
        );

        Ok(Self {
            config,
            store,
            routes,
            navigator,
            guard,
            logout,
            interceptor,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn routes(&self) -> &Arc<RouteExclusionPolicy> {
        &self.routes
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn interceptor(&self) -> &TransportErrorInterceptor {
        &self.interceptor
    }

    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    /// Guard decision for the current path
    pub fn evaluate(&self, probe: &ProbeState) -> RenderDecision {
        self.guard.evaluate(&self.current_path(), probe)
    }

    /// Run a failed exchange through the interceptor at the current path
    pub fn inspect(&self, envelope: &ErrorEnvelope) -> Interception {
        self.interceptor.inspect(&self.current_path(), envelope)
    }

    /// User-initiated logout
    pub fn logout(&self) -> SessionResult<()> {
        tracing::info!("User requested logout");
        self.logout.logout()
    }

    pub fn header(&self) -> HeaderModel {
        HeaderModel::for_session(self.store.is_authenticated())
    }

    pub fn bind_header(&self) -> HeaderBinding {
        HeaderBinding::attach(Arc::clone(&self.store))
    }

    /// End of the store's lifetime (full reload)
    pub fn shutdown(&self) {
        self.store.teardown();
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .field("routes", &self.routes)
            .field("logout", &self.logout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatterError;
    use crate::session::logout::{History, InMemoryCache};

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = AppConfig::default();
        config.routes.public_entry_point = "/chats".to_string();

        let err = AppContext::from_config(
            config,
            Arc::new(InMemoryCache::new()),
            Arc::new(History::default()),
        )
        .unwrap_err();
        assert!(matches!(err, ChatterError::Config(_)));
    }

    #[test]
    fn test_header_tracks_session() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.session.credential_file = Some(dir.path().join("credential"));

        let ctx = AppContext::from_config(
            config,
            Arc::new(InMemoryCache::new()),
            Arc::new(History::new("/")),
        )
        .unwrap();
        assert!(!ctx.header().show_settings);
        assert_eq!(ctx.routes().len(), 2);
    }
}

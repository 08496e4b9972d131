//! Logout-on-401 interceptor
//!
//! Every completed backend exchange passes through [`TransportErrorInterceptor`].
//! When the first structured error carries an unauthorized status, the
//! session is dead server-side and the client is logged out, unless the
//! user is on a public route where a 401 is an expected answer (a failed
//! login attempt).
//!
//! The envelope is never modified; normalization is left to the caller.

use serde_json::Value;
use std::sync::Arc;

use super::envelope::ErrorEnvelope;
use crate::routes::RouteExclusionPolicy;
use crate::session::logout::LogoutEffect;

/// HTTP status signalling an invalidated session
pub const UNAUTHORIZED: u16 = 401;

/// What the interceptor did with an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    /// Not an authorization failure; handed back untouched
    PassThrough,
    /// Authorization failure on a public route; left for the page to handle
    ExcludedRoute,
    /// Authorization failure; logout side effect invoked
    LoggedOut,
}

pub struct TransportErrorInterceptor {
    routes: Arc<RouteExclusionPolicy>,
    logout: Arc<dyn LogoutEffect>,
}

impl TransportErrorInterceptor {
    pub fn new(routes: Arc<RouteExclusionPolicy>, logout: Arc<dyn LogoutEffect>) -> Self {
        Self { routes, logout }
    }

    /// Inspect the failure payload of an exchange completed while `path` was current
    pub fn inspect(&self, path: &str, envelope: &ErrorEnvelope) -> Interception {
        if !envelope.has_failure() {
            return Interception::PassThrough;
        }
        tracing::debug!(path, ?envelope, "Backend exchange returned errors");

        let unauthorized = !envelope.errors.is_empty()
            && envelope.first_error_status() == Some(UNAUTHORIZED);
        if !unauthorized {
            return Interception::PassThrough;
        }

        if self.routes.is_excluded(path) {
            tracing::debug!(path, "Unauthorized on public route, leaving it to the page");
            return Interception::ExcludedRoute;
        }

        tracing::warn!(path, "Session rejected by backend, logging out");
        if let Err(e) = self.logout.logout() {
            tracing::error!("Logout after unauthorized response was incomplete: {}", e);
        }
        Interception::LoggedOut
    }

    /// Inspect a raw GraphQL response body, which may carry `errors` next to `data`
    pub fn inspect_response(&self, path: &str, body: &Value) -> Interception {
        self.inspect(path, &ErrorEnvelope::from_value(body))
    }

    /// Inspect a call result and hand it back unchanged
    pub fn intercept<T>(
        &self,
        path: &str,
        result: Result<T, ErrorEnvelope>,
    ) -> Result<T, ErrorEnvelope> {
        if let Err(envelope) = &result {
            self.inspect(path, envelope);
        }
        result
    }
}

impl std::fmt::Debug for TransportErrorInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportErrorInterceptor")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SessionError, SessionResult};
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLogout {
        calls: AtomicUsize,
        fail: bool,
    }

    impl LogoutEffect for CountingLogout {
        fn logout(&self) -> SessionResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SessionError::CredentialClear {
                    path: PathBuf::from("/tmp/credential"),
                    reason: "busy".to_string(),
                });
            }
            Ok(())
        }
    }

    fn interceptor(logout: Arc<CountingLogout>) -> TransportErrorInterceptor {
        TransportErrorInterceptor::new(Arc::new(RouteExclusionPolicy::default()), logout)
    }

    fn unauthorized() -> ErrorEnvelope {
        ErrorEnvelope::from_value(&json!({
            "errors": [{ "extensions": { "originalError": { "statusCode": 401 } } }]
        }))
    }

    #[test]
    fn test_unauthorized_on_protected_route_logs_out_once() {
        let logout = Arc::new(CountingLogout::default());
        let interceptor = interceptor(Arc::clone(&logout));

        assert_eq!(interceptor.inspect("/chats", &unauthorized()), Interception::LoggedOut);
        assert_eq!(logout.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unauthorized_on_excluded_route_is_left_alone() {
        let logout = Arc::new(CountingLogout::default());
        let interceptor = interceptor(Arc::clone(&logout));

        assert_eq!(
            interceptor.inspect("/login", &unauthorized()),
            Interception::ExcludedRoute
        );
        assert_eq!(logout.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_other_failures_pass_through() {
        let logout = Arc::new(CountingLogout::default());
        let interceptor = interceptor(Arc::clone(&logout));

        let cases = [
            json!({ "errors": [{ "extensions": { "originalError": { "statusCode": 403 } } }] }),
            json!({ "errors": [{ "message": "no status" }] }),
            json!({ "networkError": { "statusCode": 401 } }),
            json!({ "graphQLErrors": [{ "extensions": { "originalError": { "statusCode": 401 } } }] }),
            json!({ "message": "boom" }),
            json!({}),
        ];
        for case in cases {
            let envelope = ErrorEnvelope::from_value(&case);
            assert_eq!(
                interceptor.inspect("/chats", &envelope),
                Interception::PassThrough,
                "{}",
                case
            );
        }
        assert_eq!(logout.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_logout_still_reports_logged_out() {
        let logout = Arc::new(CountingLogout {
            fail: true,
            ..CountingLogout::default()
        });
        let interceptor = interceptor(Arc::clone(&logout));

        assert_eq!(interceptor.inspect("/", &unauthorized()), Interception::LoggedOut);
        assert_eq!(logout.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_intercept_returns_result_unchanged() {
        let logout = Arc::new(CountingLogout::default());
        let interceptor = interceptor(Arc::clone(&logout));

        let ok: Result<u32, ErrorEnvelope> = Ok(7);
        assert_eq!(interceptor.intercept("/chats", ok).unwrap(), 7);

        let err = interceptor
            .intercept::<u32>("/chats", Err(unauthorized()))
            .unwrap_err();
        assert_eq!(err, unauthorized());
        assert_eq!(logout.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_inspect_response_with_partial_data() {
        let logout = Arc::new(CountingLogout::default());
        let interceptor = interceptor(Arc::clone(&logout));

        let body = json!({
            "data": { "chats": null },
            "errors": [{ "message": "Unauthorized", "extensions": { "originalError": { "statusCode": 401 } } }]
        });
        assert_eq!(interceptor.inspect_response("/chats", &body), Interception::LoggedOut);
    }

    #[test]
    fn test_integral_float_status_logs_out() {
        let logout = Arc::new(CountingLogout::default());
        let interceptor = interceptor(Arc::clone(&logout));

        let body = json!({
            "errors": [{ "extensions": { "originalError": { "statusCode": 401.0 } } }]
        });
        assert_eq!(interceptor.inspect_response("/chats", &body), Interception::LoggedOut);
        assert_eq!(logout.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_positional_array_entry_passes_through() {
        let logout = Arc::new(CountingLogout::default());
        let interceptor = interceptor(Arc::clone(&logout));

        let body = json!({ "errors": [["Unauthorized", { "originalError": { "statusCode": 401 } }]] });
        assert_eq!(interceptor.inspect_response("/chats", &body), Interception::PassThrough);
        assert_eq!(logout.calls.load(Ordering::SeqCst), 0);
    }
}

//! Chatter Client Core
//!
//! This library provides the session and error policy of the Chatter chat
//! client:
//! - Session guard deciding whether protected views may render
//! - Forced logout when the backend reports an invalidated session
//! - Normalization of backend and network failures into user-facing text

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod presentation;
pub mod routes;
pub mod session;
pub mod transport;

pub use app::AppContext;
pub use config::AppConfig;
pub use error::{ChatterError, Result, SessionError};
pub use normalize::{normalize, Failure, UserMessage};
pub use routes::RouteExclusionPolicy;
pub use session::{ProbeState, SessionGuard, SessionStore};
pub use transport::{ErrorEnvelope, Interception, TransportErrorInterceptor};

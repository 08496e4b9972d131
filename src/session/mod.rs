//! Session lifecycle
//!
//! ```ignore
//! backend call ──► TransportErrorInterceptor ──(401)──► LogoutHandler
//!                                                         │
//!                                                         ▼
//! SessionProbe ──► SessionGuard ──(identity)──► SessionStore ──► subscribers
//! ```

pub mod guard;
pub mod identity;
pub mod logout;
pub mod state;

pub use guard::{RenderDecision, SessionGuard};
pub use identity::{Identity, MeResponse, ProbeState, SessionProbe, ME_QUERY};
pub use logout::{
    CredentialStore, FileCredentialStore, History, InMemoryCache, LogoutEffect, LogoutHandler,
    Navigator, ResponseCache,
};
pub use state::{SessionStore, SubscriptionId};

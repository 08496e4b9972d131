//! Backend transport boundary
//!
//! The GraphQL transport itself lives outside this crate. This module owns
//! the two things the core needs from it: a typed view of the failure payload
//! ([`ErrorEnvelope`]) and the interceptor that turns a backend 401 into a
//! forced logout.

pub mod envelope;
pub mod interceptor;

pub use envelope::{ErrorEntry, ErrorEnvelope, Extensions, NetworkError, OriginalError, OriginalMessage};
pub use interceptor::{Interception, TransportErrorInterceptor, UNAUTHORIZED};

//! Identity and the "who am I" session probe
//!
//! The canonical probe is the `Me` query. Its result is folded into a
//! [`ProbeState`] that the session guard consumes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

use crate::transport::envelope::ErrorEnvelope;

/// GraphQL document for the session probe
pub const ME_QUERY: &str = "query Me {\n  me {\n    _id\n    email\n  }\n}";

/// The authenticated user as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
}

/// `data` payload of [`ME_QUERY`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub me: Identity,
}

/// Where the session probe currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProbeState {
    /// Request in flight (or not yet issued)
    #[default]
    Pending,
    /// Backend confirmed a session
    Identity(Identity),
    /// No session; carries the failure if the backend reported one
    Absent(Option<ErrorEnvelope>),
}

impl ProbeState {
    /// Fold a GraphQL response body for [`ME_QUERY`] into a probe state
    pub fn from_response(body: &Value) -> Self {
        let me = body
            .get("data")
            .and_then(|data| MeResponse::deserialize(data).ok());
        if let Some(response) = me {
            return ProbeState::Identity(response.me);
        }

        let envelope = ErrorEnvelope::from_value(body);
        ProbeState::Absent(envelope.has_failure().then_some(envelope))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            ProbeState::Identity(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ProbeState::Pending)
    }

    /// The failure that ended the probe, if any
    pub fn error(&self) -> Option<&ErrorEnvelope> {
        match self {
            ProbeState::Absent(error) => error.as_ref(),
            _ => None,
        }
    }
}

/// Issues the session probe against the backend.
///
/// Retry and timeout policy belong to the implementation, not to the guard.
pub trait SessionProbe {
    fn probe(&self) -> impl Future<Output = ProbeState> + Send;
}

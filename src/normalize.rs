//! Error normalization
//!
//! Turns any backend or network failure into one message fit to show a user.
//! A failure is first classified into a [`Failure`], then mapped to text.
//! Classification tries four shapes in order and the first match wins:
//!
//! 1. connection refused ([`Failure::Connection`])
//! 2. transport failure with an optional HTTP status ([`Failure::Transport`])
//! 3. structured error list whose first entry yields a message ([`Failure::Application`])
//! 4. bare top-level message ([`Failure::Unstructured`]), else [`Failure::Unknown`]
//!
//! Every extracted message has its first character upper-cased and is
//! otherwise left exactly as the backend sent it.

use std::fmt;

use crate::transport::envelope::{ErrorEntry, ErrorEnvelope};

/// System error code of a refused connection
pub const CONNECTION_REFUSED_CODE: &str = "ECONNREFUSED";

pub const CONNECTION_REFUSED_MESSAGE: &str =
    "Unable to connect to server. Please check your connection.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const REAUTHENTICATE_MESSAGE: &str = "Authentication failed. Please login again.";
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred.";
pub const UNKNOWN_FAILURE_MESSAGE: &str = "An unknown error occurred.";

/// Classified failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Connection,
    Transport {
        status_code: Option<u16>,
        message: Option<String>,
    },
    /// Invariant: the first entry yields a non-empty message
    Application { entries: Vec<ErrorEntry> },
    Unstructured { message: String },
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Connection,
    Transport,
    Application,
    Unstructured,
    Unknown,
}

impl Failure {
    /// Single classification step over the envelope
    pub fn classify(envelope: &ErrorEnvelope) -> Self {
        if let Some(network) = &envelope.network_error {
            if network.code.as_deref() == Some(CONNECTION_REFUSED_CODE) {
                return Failure::Connection;
            }
            return Failure::Transport {
                status_code: network.status_code,
                message: network.message.clone(),
            };
        }

        // Client-library list first, then the raw response list
        for entries in [&envelope.graphql_errors, &envelope.errors] {
            let usable = entries
                .first()
                .and_then(ErrorEntry::best_message)
                .is_some();
            if usable {
                return Failure::Application {
                    entries: entries.clone(),
                };
            }
        }

        match envelope.message.as_deref() {
            Some(message) if !message.is_empty() => Failure::Unstructured {
                message: message.to_string(),
            },
            _ => Failure::Unknown,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::Connection => FailureKind::Connection,
            Failure::Transport { .. } => FailureKind::Transport,
            Failure::Application { .. } => FailureKind::Application,
            Failure::Unstructured { .. } => FailureKind::Unstructured,
            Failure::Unknown => FailureKind::Unknown,
        }
    }

    /// Map to the user-facing message
    pub fn to_message(&self) -> UserMessage {
        let text = match self {
            Failure::Connection => CONNECTION_REFUSED_MESSAGE.to_string(),
            Failure::Transport { status_code, message } => match status_code {
                Some(500) => SERVER_ERROR_MESSAGE.to_string(),
                Some(401) => REAUTHENTICATE_MESSAGE.to_string(),
                Some(403) => ACCESS_DENIED_MESSAGE.to_string(),
                _ => match message.as_deref() {
                    Some(message) if !message.is_empty() => capitalize_first(message),
                    _ => NETWORK_ERROR_MESSAGE.to_string(),
                },
            },
            Failure::Application { entries } => {
                match entries.first().and_then(ErrorEntry::best_message) {
                    Some(message) => capitalize_first(message),
                    None => return UserMessage::unknown(),
                }
            }
            Failure::Unstructured { message } => capitalize_first(message),
            Failure::Unknown => return UserMessage::unknown(),
        };

        UserMessage {
            text,
            kind: self.kind(),
        }
    }
}

/// Non-empty, first-letter-capitalized message for display
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserMessage {
    text: String,
    kind: FailureKind,
}

impl UserMessage {
    fn unknown() -> Self {
        Self {
            text: UNKNOWN_FAILURE_MESSAGE.to_string(),
            kind: FailureKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// True when nothing recognizable could be extracted
    pub fn is_unknown(&self) -> bool {
        self.kind == FailureKind::Unknown
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for UserMessage {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Normalize a failure payload. Always yields a message; see [`UserMessage::is_unknown`].
pub fn normalize(envelope: &ErrorEnvelope) -> UserMessage {
    let failure = Failure::classify(envelope);
    tracing::trace!(kind = ?failure.kind(), "Classified failure");
    failure.to_message()
}

/// Normalize a call result; `None` when the call succeeded
pub fn normalize_result<T>(result: &Result<T, ErrorEnvelope>) -> Option<UserMessage> {
    result.as_ref().err().map(normalize)
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize_first(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

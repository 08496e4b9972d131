//! User feedback built from normalized errors
//!
//! Forms keep a single error line; toasts ("snacks") carry a message and a
//! severity. Both fall back to [`UNKNOWN_ERROR_MESSAGE`] when a failure has
//! nothing recognizable in it.

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, UserMessage};
use crate::transport::envelope::ErrorEnvelope;

/// Shown when a failure carries no usable message
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error has occurred. Please try again later";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnackKind {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnackMessage {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: SnackKind,
}

impl SnackMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: SnackKind::Error,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: SnackKind::Success,
        }
    }

    pub fn unknown_error() -> Self {
        Self::error(UNKNOWN_ERROR_MESSAGE)
    }

    /// Error snack for a failed backend call
    pub fn from_failure(envelope: &ErrorEnvelope) -> Self {
        Self::error(display_text(normalize(envelope)))
    }
}

/// Error line under a form, e.g. signup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormError {
    message: String,
}

impl FormError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text; empty when there is nothing to show
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }

    pub fn clear(&mut self) {
        self.message.clear();
    }

    /// Update from a submission result: success clears, failure shows the normalized message
    pub fn record<T>(&mut self, result: &Result<T, ErrorEnvelope>) {
        match result {
            Ok(_) => self.clear(),
            Err(envelope) => {
                let message = normalize(envelope);
                if message.is_unknown() {
                    tracing::debug!(?envelope, "Form submission failed without a usable message");
                }
                self.message = display_text(message);
            }
        }
    }
}

fn display_text(message: UserMessage) -> String {
    if message.is_unknown() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message.into_string()
    }
}

//! Chatter Error Types
//!
//! Centralized error handling using thiserror for type-safe errors.
//!
//! These are internal failures (I/O, configuration). Failures reported by the
//! backend are never surfaced through `Display` of these types; they go through
//! [`crate::normalize`] to become user-facing text.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::config::ConfigError;

/// Top-level error type for Chatter
#[derive(Error, Debug)]
pub enum ChatterError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Session lifecycle errors (credential persistence, logout navigation)
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read credential '{path}': {reason}")]
    CredentialRead { path: PathBuf, reason: String },

    #[error("Failed to write credential '{path}': {reason}")]
    CredentialWrite { path: PathBuf, reason: String },

    #[error("Failed to clear credential '{path}': {reason}")]
    CredentialClear { path: PathBuf, reason: String },

    #[error("Cannot navigate to '{path}': {reason}")]
    Navigation { path: String, reason: String },
}

/// Result type alias for Chatter operations
pub type Result<T> = std::result::Result<T, ChatterError>;

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result type alias for Config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::CredentialClear {
            path: PathBuf::from("/tmp/credential"),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to clear credential '/tmp/credential': permission denied"
        );

        let err = SessionError::Navigation {
            path: "login".to_string(),
            reason: "path must start with '/'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot navigate to 'login': path must start with '/'"
        );
    }

    #[test]
    fn test_error_conversion() {
        let session_err = SessionError::CredentialWrite {
            path: PathBuf::from("/tmp/credential"),
            reason: "read-only file system".to_string(),
        };
        let chatter_err: ChatterError = session_err.into();
        assert!(matches!(chatter_err, ChatterError::Session(_)));

        let config_err = ConfigError::Invalid("bad".to_string());
        let chatter_err: ChatterError = config_err.into();
        assert!(matches!(chatter_err, ChatterError::Config(_)));
    }
}

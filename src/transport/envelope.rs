//! Backend error envelope
//!
//! Typed view of the error shape delivered by the GraphQL transport:
//!
//! ```json
//! {
//!   "errors": [
//!     { "message": "...", "extensions": { "originalError": { "statusCode": 401, "message": ["..."] } } }
//!   ],
//!   "graphQLErrors": [ ... same entry shape ... ],
//!   "networkError": { "code": "ECONNREFUSED", "statusCode": 500, "message": "..." },
//!   "message": "..."
//! }
//! ```
//!
//! Decoding never fails on a malformed field. A field with the wrong JSON
//! type decodes as absent, and a list entry that is not an object decodes as
//! an empty entry so index 0 still means "the first error".

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure payload of one backend exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Structured errors as carried in the raw GraphQL response
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,

    /// Structured errors as surfaced by the client library
    #[serde(
        default,
        rename = "graphQLErrors",
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub graphql_errors: Vec<ErrorEntry>,

    /// Transport failure (no response, or a non-GraphQL HTTP status)
    #[serde(
        default,
        rename = "networkError",
        deserialize_with = "lenient_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub network_error: Option<NetworkError>,

    /// Generic top-level message of the failure object
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One entry of a structured error list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extensions {
    #[serde(
        default,
        rename = "originalError",
        deserialize_with = "lenient_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_error: Option<OriginalError>,
}

/// The server-side exception wrapped by the GraphQL layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalError {
    #[serde(
        default,
        rename = "statusCode",
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<u16>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<OriginalMessage>,
}

/// Validation layers report a list of messages, everything else a single one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OriginalMessage {
    Single(String),
    List(Vec<String>),
}

impl OriginalMessage {
    /// The message to show: the string itself, or the first element of a list
    pub fn first(&self) -> Option<&str> {
        match self {
            OriginalMessage::Single(message) => Some(message.as_str()),
            OriginalMessage::List(messages) => messages.first().map(String::as_str),
        }
    }
}

impl<'de> Deserialize<'de> for OriginalMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(message) => Ok(OriginalMessage::Single(message)),
            // Non-string elements become empty so they are skipped as "no message"
            Value::Array(items) => Ok(OriginalMessage::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(message) => message,
                        _ => String::new(),
                    })
                    .collect(),
            )),
            other => Err(D::Error::custom(format!(
                "expected string or list of strings, found {}",
                other
            ))),
        }
    }
}

/// Transport-level failure details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkError {
    /// System error code, e.g. `ECONNREFUSED`
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(
        default,
        rename = "statusCode",
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<u16>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Decode any JSON value; anything unrecognizable yields an empty envelope
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::deserialize(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Decode a JSON document; invalid JSON yields an envelope carrying only the parse message
    pub fn from_json_str(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(e) => Self {
                message: Some(e.to_string()),
                ..Self::default()
            },
        }
    }

    /// True if any recognizable failure information is present
    pub fn has_failure(&self) -> bool {
        !self.errors.is_empty()
            || !self.graphql_errors.is_empty()
            || self.network_error.is_some()
            || self.message.is_some()
    }

    /// `errors[0].extensions.originalError.statusCode`
    pub fn first_error_status(&self) -> Option<u16> {
        self.errors.first().and_then(ErrorEntry::status_code)
    }
}

impl ErrorEntry {
    pub fn status_code(&self) -> Option<u16> {
        self.original_error().and_then(|original| original.status_code)
    }

    /// Nested `originalError.message` when non-empty, else the entry's own message
    pub fn best_message(&self) -> Option<&str> {
        self.original_error()
            .and_then(|original| original.message.as_ref())
            .and_then(OriginalMessage::first)
            .filter(|message| !message.is_empty())
            .or_else(|| self.message.as_deref().filter(|message| !message.is_empty()))
    }

    fn original_error(&self) -> Option<&OriginalError> {
        self.extensions
            .as_ref()
            .and_then(|extensions| extensions.original_error.as_ref())
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Like [`lenient`], but only a JSON object may decode into a struct.
/// Derived struct impls also accept the sequence form, which would bind
/// array elements to fields by position.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(T::deserialize(value).ok()),
        _ => Ok(None),
    }
}

/// HTTP status as a JSON number; integral floats such as `401.0` count
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Number(number) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let status = match number.as_u64() {
        Some(status) => u16::try_from(status).ok(),
        None => number
            .as_f64()
            .filter(|status| status.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(status))
            .map(|status| status as u16),
    };
    Ok(status)
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => T::deserialize(item).unwrap_or_default(),
                _ => T::default(),
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}

//! Error types shared by the list managers and the REST client.

use thiserror::Error;

/// A failed remote call, rendered as a single line of plain text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    #[error("cannot reach server at {url}")]
    Unreachable { url: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Non-2xx response. `message` is the server's own message when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected response from server: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl RemoteError {
    /// The message sent by the server, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RemoteError::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Rejected attempt to merge a value into form state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },
}

impl FormError {
    pub(crate) fn invalid(field: &str, value: &str) -> Self {
        FormError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// A validation failure bound to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn required(field: &'static str, label: &str) -> Self {
        Self::new(field, format!("{label} is required"))
    }
}

//! Error types for knot-tools.

pub mod kind;

pub use kind::{ErrorEnvelope, ErrorKind};

use thiserror::Error;

/// Primary error type for every tool operation.
#[derive(Error, Debug)]
pub enum KnotError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("{status} {message}")]
    Authentication { status: u16, message: String },

    #[error("{status} {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl KnotError {
    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an API error from a non-2xx response.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::UnknownTool(_) | Self::Serialization(_) => {
                ErrorKind::Validation
            }
            Self::Authentication { .. } => ErrorKind::Auth,
            Self::Api { .. } => ErrorKind::Backend,
            Self::Network(_) | Self::Io(_) | Self::InvalidUrl(_) => ErrorKind::Transport,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// HTTP status reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether a caller wrapping this layer could reasonably retry.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }

    /// Build the uniform error envelope for this error.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.to_string(),
            kind: self.kind(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, KnotError>;

/// Collapse an operation result into the envelope handed back to the caller.
pub fn into_envelope(result: Result<serde_json::Value>) -> serde_json::Value {
    match result {
        Ok(value) => value,
        Err(e) => e.to_envelope().into_value(),
    }
}

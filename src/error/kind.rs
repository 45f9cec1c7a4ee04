//! Error classification and the uniform error envelope.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Broad error kind carried in every error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Caller arguments failed schema constraints. No request was sent.
    Validation,
    /// The backend rejected the credentials (401/403).
    Auth,
    /// The backend answered with any other non-2xx status.
    Backend,
    /// The request could not be completed at the network level.
    Transport,
    /// Invalid configuration, raised at startup.
    Configuration,
}

/// Error envelope returned from a tool invocation.
///
/// Serializes as `{"error": "<message>", "kind": "<kind>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub kind: ErrorKind,
}

impl ErrorEnvelope {
    /// Convert to a JSON value.
    pub fn into_value(self) -> serde_json::Value {
        serde_json::json!({
            "error": self.error,
            "kind": self.kind,
        })
    }

    /// Recognize an error envelope in an arbitrary tool result.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let error = obj.get("error")?.as_str()?.to_string();
        let kind = obj
            .get("kind")
            .and_then(|k| k.as_str())
            .and_then(|k| k.parse().ok())?;
        Some(Self { error, kind })
    }
}

//! Basic authentication credentials for the backend.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::error::{KnotError, Result};

/// Placeholder credentials accepted by the mock backend. Real deployments
/// set `KNOT_USERNAME` / `KNOT_PASSWORD` or the config file.
const PLACEHOLDER_USERNAME: &str = "username";
const PLACEHOLDER_PASSWORD: &str = "password";

/// Username/password pair sent as `Authorization: Basic ...`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether these are still the built-in placeholder values.
    pub fn is_placeholder(&self) -> bool {
        self.username == PLACEHOLDER_USERNAME && self.password == PLACEHOLDER_PASSWORD
    }

    /// `Basic <base64(username:password)>`.
    pub fn header_value(&self) -> Result<HeaderValue> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|e| KnotError::Configuration(format!("invalid credentials: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl Default for BasicCredentials {
    fn default() -> Self {
        Self::new(PLACEHOLDER_USERNAME, PLACEHOLDER_PASSWORD)
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

//! Configuration system (layered: code > env > config file > defaults).

pub mod auth;

pub use auth::BasicCredentials;

use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::{KnotError, Result};
use crate::schema::{Address, Name, User};

/// Address of the local mock backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8002";
pub const DEFAULT_USER_AGENT: &str = "mcp-client";
pub const DEFAULT_EXTERNAL_USER_ID: &str = "test-user-123";
pub const DEFAULT_MERCHANT_STATUS: &str = "active";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration for the backend client and tool defaults.
#[derive(Debug, Clone)]
pub struct KnotConfig {
    pub base_url: Url,
    pub credentials: BasicCredentials,
    pub timeout: Duration,
    /// Sent as `user_agent` when `list_merchants` gets none.
    pub default_user_agent: String,
    /// Identity used by `list_merchants` and by `create_session` when the
    /// caller supplies none.
    pub default_external_user_id: String,
    pub default_merchant_status: String,
    /// Cardholder used by `switch_card` when the caller supplies no `user`.
    pub default_user: User,
}

impl Default for KnotConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            credentials: BasicCredentials::default(),
            timeout: DEFAULT_TIMEOUT,
            default_user_agent: DEFAULT_USER_AGENT.to_string(),
            default_external_user_id: DEFAULT_EXTERNAL_USER_ID.to_string(),
            default_merchant_status: DEFAULT_MERCHANT_STATUS.to_string(),
            default_user: placeholder_user(),
        }
    }
}

fn placeholder_user() -> User {
    User {
        name: Name {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
        },
        phone_number: "+11234567890".to_string(),
        address: Address {
            street: "123 Main St".to_string(),
            street2: None,
            city: "New York".to_string(),
            region: "NY".to_string(),
            postal_code: "10001".to_string(),
            country: "US".to_string(),
        },
    }
}

/// On-disk TOML layout. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    external_user_id: Option<String>,
    merchant_status: Option<String>,
    default_user: Option<User>,
}

impl KnotConfig {
    /// Load from `.env`, the process environment and an optional TOML file.
    ///
    /// When `path` is `None`, `KNOT_CONFIG` names the file if set.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        let env_path = std::env::var("KNOT_CONFIG").ok();
        if let Some(path) = path.or(env_path.as_deref().map(Path::new)) {
            config.apply_file(path)?;
        }

        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults overlaid with environment variables only.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay a TOML config file.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            KnotError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        self.apply_toml(&raw)
            .map_err(|e| KnotError::Configuration(format!("{}: {e}", path.display())))
    }

    /// Overlay TOML config text.
    pub fn apply_toml(&mut self, raw: &str) -> Result<()> {
        let file: ConfigFile =
            toml::from_str(raw).map_err(|e| KnotError::Configuration(e.to_string()))?;

        if let Some(url) = file.base_url {
            self.set_base_url(&url)?;
        }
        if let Some(username) = file.username {
            self.credentials.username = username;
        }
        if let Some(password) = file.password {
            self.credentials.password = password;
        }
        if let Some(secs) = file.timeout_secs {
            self.set_timeout(Duration::from_secs(secs))?;
        }
        if let Some(user_agent) = file.user_agent {
            self.default_user_agent = user_agent;
        }
        if let Some(id) = file.external_user_id {
            self.default_external_user_id = id;
        }
        if let Some(status) = file.merchant_status {
            self.default_merchant_status = status;
        }
        if let Some(user) = file.default_user {
            self.default_user = user;
        }
        Ok(())
    }

    /// Overlay `KNOT_*` variables read through `lookup`.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("KNOT_BASE_URL") {
            self.set_base_url(&url)?;
        }
        if let Some(username) = lookup("KNOT_USERNAME") {
            self.credentials.username = username;
        }
        if let Some(password) = lookup("KNOT_PASSWORD") {
            self.credentials.password = password;
        }
        if let Some(raw) = lookup("KNOT_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                KnotError::Configuration(format!(
                    "KNOT_TIMEOUT_SECS must be an integer, got '{raw}'"
                ))
            })?;
            self.set_timeout(Duration::from_secs(secs))?;
        }
        if let Some(user_agent) = lookup("KNOT_USER_AGENT") {
            self.default_user_agent = user_agent;
        }
        if let Some(id) = lookup("KNOT_EXTERNAL_USER_ID") {
            self.default_external_user_id = id;
        }
        if let Some(status) = lookup("KNOT_MERCHANT_STATUS") {
            self.default_merchant_status = status;
        }
        Ok(())
    }

    /// Builder: override the backend base URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.set_base_url(url)?;
        Ok(self)
    }

    /// Builder: override the credentials.
    pub fn with_credentials(mut self, credentials: BasicCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Builder: override the request timeout. Zero is rejected.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.set_timeout(timeout)?;
        Ok(self)
    }

    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|e| KnotError::Configuration(format!("invalid base url '{url}': {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(KnotError::Configuration(format!(
                "base url '{url}' cannot be a base"
            )));
        }
        self.base_url = parsed;
        Ok(())
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout.is_zero() {
            return Err(KnotError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        self.timeout = timeout;
        Ok(())
    }
}

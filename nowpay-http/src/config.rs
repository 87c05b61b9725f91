//! Client configuration.
//!
//! Loads the API key and server from a JSON file, from environment variables,
//! or both. File keys are camelCase:
//!
//! ```json
//! {
//!   "server": "https://api-sandbox.nowpayments.io/v1/",
//!   "apiKey": "YOUR-API-KEY",
//!   "ipnSecret": "...",
//!   "timeoutSecs": 30
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `NOWPAYMENTS_CONFIG` — Path to a JSON configuration file
//! - `NOWPAYMENTS_API_KEY` — API key (overrides the file value)
//! - `NOWPAYMENTS_SERVER` — Base URL (overrides the file value)
//! - `NOWPAYMENTS_SANDBOX` — `1` or `true` selects the sandbox base URL
//! - `NOWPAYMENTS_IPN_SECRET` — IPN secret
//! - `NOWPAYMENTS_TIMEOUT_SECS` — Request timeout in seconds

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_TIMEOUT_SECS, PRODUCTION_URL, SANDBOX_URL};
use crate::error::ConfigError;

/// Environment variable holding the configuration file path.
pub const CONFIG_PATH_VAR: &str = "NOWPAYMENTS_CONFIG";
/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "NOWPAYMENTS_API_KEY";
/// Environment variable holding the base URL.
pub const SERVER_VAR: &str = "NOWPAYMENTS_SERVER";
/// Environment variable selecting the sandbox.
pub const SANDBOX_VAR: &str = "NOWPAYMENTS_SANDBOX";
/// Environment variable holding the IPN secret.
pub const IPN_SECRET_VAR: &str = "NOWPAYMENTS_IPN_SECRET";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "NOWPAYMENTS_TIMEOUT_SECS";

/// Settings for talking to the payment API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// API base URL (default: production).
    #[serde(default = "default_server")]
    pub server: String,

    /// API key sent in the `x-api-key` header.
    #[serde(default)]
    pub api_key: String,

    /// Secret used to sign instant payment notifications. Only carried here;
    /// this crate does not verify notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipn_secret: Option<String>,

    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server() -> String {
    PRODUCTION_URL.to_owned()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            api_key: String::new(),
            ipn_secret: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("has_api_key", &!self.api_key.is_empty())
            .field("has_ipn_secret", &self.ipn_secret.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a production config with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Creates a sandbox config with the given API key.
    #[must_use]
    pub fn sandbox(api_key: impl Into<String>) -> Self {
        Self::new(api_key).with_server(SANDBOX_URL)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Sets the request timeout. Sub-second precision is dropped.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the base URL, normalized to end with a single `/` so route
    /// paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidServer`] if `server` is not a valid URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut normalized = self.server.trim().trim_end_matches('/').to_owned();
        normalized.push('/');
        Url::parse(&normalized).map_err(|source| ConfigError::InvalidServer {
            url: self.server.clone(),
            source,
        })
    }

    /// Checks that an API key is set, the timeout is non-zero and the server
    /// URL parses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`], [`ConfigError::InvalidTimeout`]
    /// or [`ConfigError::InvalidServer`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs.to_string()));
        }
        self.base_url().map(|_| ())
    }

    /// Loads configuration from the file named by `NOWPAYMENTS_CONFIG`, or
    /// from the environment alone when it is unset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::load_from(path),
            Err(_) => Self::from_env(),
        }
    }

    /// Loads configuration from a JSON file, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or the
    /// resulting configuration is invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        let config = config.with_overrides(env_var)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds configuration from environment variables only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if `NOWPAYMENTS_API_KEY` is unset,
    /// or another [`ConfigError`] for malformed values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self::default().with_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment-style overrides. `NOWPAYMENTS_SERVER` wins over
    /// `NOWPAYMENTS_SANDBOX`.
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(api_key) = lookup(API_KEY_VAR) {
            self.api_key = api_key;
        }
        if lookup(SANDBOX_VAR).is_some_and(|v| is_truthy(&v)) {
            self.server = SANDBOX_URL.to_owned();
        }
        if let Some(server) = lookup(SERVER_VAR) {
            self.server = server;
        }
        if let Some(secret) = lookup(IPN_SECRET_VAR) {
            self.ipn_secret = Some(secret);
        }
        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            self.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(timeout))?;
        }
        Ok(self)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

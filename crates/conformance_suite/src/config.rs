//! Configuration for the conformance suite.
//!
//! Values are resolved in layers: built-in defaults, then an optional TOML
//! file, then environment variables, then command-line overrides. The
//! defaults target the public restful-booker demo instance with its
//! documented admin credentials.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! base_url = "http://localhost:3001"
//! username = "admin"
//! password = "password123"
//! request_timeout_secs = 5
//! ping_ceiling_ms = 20000
//! ```

use std::{fmt, fs, path::Path, time::Duration};

use booker_client::{ClientSettings, Credentials, DEFAULT_BASE_URL};
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::ConfigError;

pub const ENV_BASE_URL: &str = "BOOKER_BASE_URL";
pub const ENV_USERNAME: &str = "BOOKER_USERNAME";
pub const ENV_PASSWORD: &str = "BOOKER_PASSWORD";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "BOOKER_REQUEST_TIMEOUT_SECS";
pub const ENV_PING_CEILING_MS: &str = "BOOKER_PING_CEILING_MS";

/// Latency ceiling for the health check.
pub const DEFAULT_PING_CEILING_MS: u64 = 20_000;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Settings for one suite run.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Base URL of the booking service.
    pub base_url: String,

    pub username: String,

    pub password: String,

    /// Timeout applied to every individual HTTP request.
    pub request_timeout_secs: u64,

    /// Upper bound on the health check's response time.
    pub ping_ceiling_ms: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: "admin".to_string(),
            password: "password123".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            ping_ceiling_ms: DEFAULT_PING_CEILING_MS,
        }
    }
}

impl fmt::Debug for SuiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("ping_ceiling_ms", &self.ping_ceiling_ms)
            .finish()
    }
}

impl SuiteConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Read` if it cannot be read and `ConfigError::Parse`
    /// if it is not valid TOML for this structure.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(ConfigError::Read)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Resolves the configuration for a run.
    ///
    /// Starts from the file at `path` (or defaults when `None`), applies
    /// environment variables, then `base_url_override`, and validates the
    /// result.
    pub fn resolve(
        path: Option<&Path>,
        base_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;

        if let Some(base_url) = base_url_override {
            config.base_url = base_url.to_string();
        }

        config.validate()?;

        info!(
            base_url = config.base_url,
            username = config.username,
            request_timeout_secs = config.request_timeout_secs,
            ping_ceiling_ms = config.ping_ceiling_ms,
            "Resolved suite configuration"
        );

        Ok(config)
    }

    /// Applies overrides from `lookup`, keyed by the `BOOKER_*` variable
    /// names. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_of = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = value_of(ENV_BASE_URL) {
            self.base_url = value;
        }
        if let Some(value) = value_of(ENV_USERNAME) {
            self.username = value;
        }
        if let Some(value) = value_of(ENV_PASSWORD) {
            self.password = value;
        }
        if let Some(value) = value_of(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_number(ENV_REQUEST_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = value_of(ENV_PING_CEILING_MS) {
            self.ping_ceiling_ms = parse_number(ENV_PING_CEILING_MS, &value)?;
        }

        Ok(())
    }

    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::Invalid("username must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.ping_ceiling_ms == 0 {
            return Err(ConfigError::Invalid(
                "ping_ceiling_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::new(self.base_url.clone())
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    pub fn ping_ceiling(&self) -> Duration {
        Duration::from_millis(self.ping_ceiling_ms)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

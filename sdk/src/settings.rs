//! Client settings, from a JSON file or the environment

use std::path::Path;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::errors::{ClientError, ValidationError};
use crate::http::client::{ClientOptions, KaginawaClient};
use crate::logs::LogLevel;

pub const ENV_ENDPOINT: &str = "KAGINAWA_ENDPOINT";
pub const ENV_API_KEY: &str = "KAGINAWA_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "KAGINAWA_TIMEOUT_SECS";
pub const ENV_PROXY: &str = "KAGINAWA_PROXY";
pub const ENV_LOG_LEVEL: &str = "KAGINAWA_LOG_LEVEL";

/// Client settings
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Server endpoint, `http://...` or `https://...`
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key with the admin role
    #[serde(default, deserialize_with = "secret")]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds, 30 when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    /// Log level, info when unset
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Timeouts must be at least one second.
fn check_timeout(timeout_secs: Option<u64>) -> Result<Option<u64>, ClientError> {
    match timeout_secs {
        Some(0) => Err(ClientError::Config("timeout must be at least 1 second".to_string())),
        other => Ok(other),
    }
}

fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(SecretString::from))
}


impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ClientError::Config(format!("unable to read {}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ClientError> {
        let mut settings: Settings = serde_json::from_str(contents)
            .map_err(|e| ClientError::Config(format!("invalid settings: {}", e)))?;
        settings.timeout_secs = check_timeout(settings.timeout_secs)?;
        Ok(settings)
    }

    /// Read settings from `KAGINAWA_*` environment variables
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut settings = Settings {
            endpoint: non_empty(ENV_ENDPOINT),
            api_key: non_empty(ENV_API_KEY).map(SecretString::from),
            proxy: non_empty(ENV_PROXY),
            ..Default::default()
        };
        if let Some(timeout) = non_empty(ENV_TIMEOUT_SECS) {
            let secs = timeout.trim().parse().map_err(|_| {
                ClientError::Config(format!("{} is not a number: {}", ENV_TIMEOUT_SECS, timeout))
            })?;
            settings.timeout_secs = check_timeout(Some(secs))?;
        }
        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            settings.log_level = Some(level.parse().map_err(ClientError::Config)?);
        }
        Ok(settings)
    }

    /// Fill unset values from `other`
    pub fn or(self, other: Settings) -> Settings {
        Settings {
            endpoint: self.endpoint.or(other.endpoint),
            api_key: self.api_key.or(other.api_key),
            timeout_secs: self.timeout_secs.or(other.timeout_secs),
            proxy: self.proxy.or(other.proxy),
            log_level: self.log_level.or(other.log_level),
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            proxy: self.proxy.clone(),
            ..Default::default()
        }
    }

    /// Build a client from these settings
    pub fn connect(&self) -> Result<KaginawaClient, ClientError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ValidationError::Missing("endpoint"))?;
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ValidationError::Missing("api key"))?;
        KaginawaClient::with_options(endpoint, api_key.expose_secret(), self.client_options())
    }
}

use crate::sender::{Endpoint, TransportConfig, TransportError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Client settings, read from TOML and overridable through `GAMP_*`
/// environment variables. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL, or one of the sentinels `""`, `"https"`, `"http"`.
    pub endpoint: String,
    #[serde(with = "duration_millis", rename = "timeout_ms")]
    pub timeout: Duration,
    #[serde(with = "duration_millis", rename = "connect_timeout_ms")]
    pub connect_timeout: Duration,
    pub max_idle_connections: usize,
    #[serde(with = "duration_millis", rename = "keep_alive_timeout_ms")]
    pub keep_alive_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            endpoint: "https".to_string(),
            timeout: transport.timeout,
            connect_timeout: transport.connection_timeout,
            max_idle_connections: transport.max_idle_connections,
            keep_alive_timeout: transport.keep_alive_timeout,
            user_agent: transport.user_agent,
        }
    }
}

impl ClientConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        load_env_string("GAMP_ENDPOINT", &mut self.endpoint);
        load_env_string("GAMP_USER_AGENT", &mut self.user_agent);

        let mut timeout_ms = self.timeout.as_millis() as u64;
        load_env_var("GAMP_TIMEOUT_MS", &mut timeout_ms)?;
        self.timeout = Duration::from_millis(timeout_ms);

        let mut connect_timeout_ms = self.connect_timeout.as_millis() as u64;
        load_env_var("GAMP_CONNECT_TIMEOUT_MS", &mut connect_timeout_ms)?;
        self.connect_timeout = Duration::from_millis(connect_timeout_ms);

        load_env_var("GAMP_MAX_IDLE_CONNECTIONS", &mut self.max_idle_connections)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Endpoint::Custom(base) = self.endpoint() {
            Url::parse(&base).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid endpoint URL '{base}': {e}"))
            })?;
            if !base.ends_with('/') {
                return Err(ConfigError::InvalidUrl(format!(
                    "Endpoint URL '{base}' must end with '/'"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "Connection timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::parse(&self.endpoint)
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            connection_timeout: self.connect_timeout,
            max_idle_connections: self.max_idle_connections,
            keep_alive_timeout: self.keep_alive_timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Loads and parses an environment variable; a missing variable keeps the
/// current value.
pub fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

pub fn load_env_string(name: &str, target: &mut String) {
    if let Ok(value) = std::env::var(name) {
        *target = value;
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

//! Logger configuration

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default deadline for a single provider write
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable settings consumed by the logger
///
/// # Example
///
/// ```
/// use log_dispatch::core::{LoggerConfiguration, LogLevel};
///
/// let config = LoggerConfiguration::from_json(
///     r#"{ "is_logging_enabled": true, "logging_level": "Warn", "write_timeout_ms": 500 }"#,
/// ).unwrap();
///
/// assert_eq!(config.logging_level, LogLevel::Warn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfiguration {
    /// Master switch for non-audit logging
    pub is_logging_enabled: bool,

    /// Minimum level for non-audit entries
    pub logging_level: LogLevel,

    /// Application id stamped on entries that carry none, unless an
    /// application id provider is injected into the logger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,

    /// Deadline for each provider write; `None` waits indefinitely
    #[serde(rename = "write_timeout_ms", with = "timeout_millis")]
    pub write_timeout: Option<Duration>,
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self {
            is_logging_enabled: true,
            logging_level: LogLevel::Info,
            application_id: None,
            write_timeout: Some(DEFAULT_WRITE_TIMEOUT),
        }
    }
}

impl LoggerConfiguration {
    pub fn new(is_logging_enabled: bool, logging_level: LogLevel) -> Self {
        Self {
            is_logging_enabled,
            logging_level,
            ..Default::default()
        }
    }

    /// Configuration with logging switched off (audit entries still flow)
    pub fn disabled() -> Self {
        Self::new(false, LogLevel::Info)
    }

    #[must_use]
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.write_timeout == Some(Duration::ZERO) {
            return Err(LoggerError::config(
                "LoggerConfiguration",
                "write_timeout must be greater than zero",
            ));
        }
        if matches!(self.application_id, Some(ref id) if id.trim().is_empty()) {
            return Err(LoggerError::config(
                "LoggerConfiguration",
                "application_id must not be blank when set",
            ));
        }
        Ok(())
    }
}

mod timeout_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(timeout) => serializer.serialize_some(&(timeout.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

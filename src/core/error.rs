//! Error types for the log dispatcher

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A required constructor argument was missing or empty
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A provider reported a failed write
    #[error("Provider '{provider}' failed to write entry: {message}")]
    ProviderWrite { provider: String, message: String },

    /// A provider did not finish its write within the configured deadline
    #[error("Provider '{provider}' did not complete its write within {timeout:?}")]
    WriteTimeout { provider: String, timeout: Duration },

    /// A provider panicked while writing
    #[error("Provider '{provider}' panicked while writing: {message}")]
    ProviderPanicked { provider: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a provider write error
    pub fn provider_write(provider: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ProviderWrite {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a write timeout error
    pub fn write_timeout(provider: impl Into<String>, timeout: Duration) -> Self {
        LoggerError::WriteTimeout {
            provider: provider.into(),
            timeout,
        }
    }

    /// Create a provider panic error
    pub fn provider_panicked(provider: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ProviderPanicked {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error was raised while building a logger
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidArgument { .. } | LoggerError::InvalidConfiguration { .. }
        )
    }
}

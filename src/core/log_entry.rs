//! Log entry structure

use super::caller_info::CallerInfo;
use super::log_context::{FieldValue, LogContext};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// The unit of work handed to [`Logger::log_async`](crate::Logger::log_async)
///
/// An entry is owned by the calling code until dispatch. During dispatch the
/// logger and its context providers fill in the application id, unique id,
/// caller info and extended properties in place, before any provider sees it.
/// An entry must not be dispatched by two concurrent calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Blank until set by the caller or by the logger
    #[serde(default)]
    pub application_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_info: Option<CallerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    pub thread_id: String,
    pub thread_name: Option<String>,
    #[serde(default, skip_serializing_if = "LogContext::is_empty")]
    pub extended_properties: LogContext,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message.into()),
            timestamp: Utc::now(),
            application_id: String::new(),
            unique_id: None,
            caller_info: None,
            exception: None,
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            extended_properties: LogContext::new(),
        }
    }

    #[must_use]
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = application_id.into();
        self
    }

    #[must_use]
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Attach error details (for example a formatted error chain)
    #[must_use]
    pub fn with_exception(mut self, exception: impl std::fmt::Display) -> Self {
        self.exception = Some(exception.to_string());
        self
    }

    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.extended_properties.add_field(key, value);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.extended_properties = context;
        self
    }

    /// Attach call-site metadata unless the entry already has some
    ///
    /// Returns `true` when the caller info was attached.
    pub fn add_caller_info(&mut self, caller: CallerInfo) -> bool {
        if self.caller_info.is_some() {
            return false;
        }
        self.caller_info = Some(caller);
        true
    }

    /// Whether the application id is empty or whitespace only
    pub fn has_blank_application_id(&self) -> bool {
        self.application_id.trim().is_empty()
    }
}

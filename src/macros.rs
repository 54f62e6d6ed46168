//! Logging macros that capture the call site.
//!
//! Each macro builds a [`LogEntry`](crate::LogEntry), records where it was
//! invoked with [`caller_info!`](crate::caller_info), and returns the
//! dispatch future. Await it like any other async call.
//!
//! # Examples
//!
//! ```
//! use log_dispatch::prelude::*;
//! use log_dispatch::{dispatch, info};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<()> {
//! let logger = Logger::builder()
//!     .configuration(LoggerConfiguration::default())
//!     .provider(Arc::new(NullLogProvider::new()))
//!     .build()?;
//!
//! // Message with format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).await;
//!
//! // Pre-built entry, enriched in place
//! let mut entry = LogEntry::new(LogLevel::Warn, "Cache miss").with_field("key", "user:42");
//! dispatch!(logger, entry).await;
//! assert!(entry.caller_info.is_some());
//! # Ok(())
//! # }
//! ```

/// Dispatch an existing entry, enriching it in place.
#[macro_export]
macro_rules! dispatch {
    ($logger:expr, $entry:expr) => {
        $logger.log_async(&mut $entry, $crate::caller_info!())
    };
}

/// Log a message at the given level.
///
/// The future resolves to the enriched entry.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(
            $crate::core::LogEntry::new($level, format!($($arg)+)),
            $crate::caller_info!(),
        )
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Log an audit record.
///
/// Audit records bypass the enablement gate and throttling, and go to the
/// dedicated audit provider when one is configured.
#[macro_export]
macro_rules! audit {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Audit, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogEntry, LogLevel, Logger, LoggerConfiguration};
    use crate::providers::NullLogProvider;
    use std::sync::Arc;

    fn logger() -> Logger {
        Logger::builder()
            .configuration(LoggerConfiguration::new(true, LogLevel::Trace))
            .provider(Arc::new(NullLogProvider::new()))
            .build()
            .expect("valid logger")
    }

    #[tokio::test]
    async fn test_level_macros_capture_call_site() {
        let logger = logger();

        let entry = info!(logger, "Items: {}", 100).await;
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "Items: 100");

        let caller = entry.caller_info.expect("caller captured");
        assert_eq!(caller.file_path.as_deref(), Some(file!()));
        assert_eq!(caller.member_name.as_deref(), Some(module_path!()));
    }

    #[tokio::test]
    async fn test_every_level_macro() {
        let logger = logger();
        assert_eq!(trace!(logger, "t").await.level, LogLevel::Trace);
        assert_eq!(debug!(logger, "d").await.level, LogLevel::Debug);
        assert_eq!(warn!(logger, "w {}", 1).await.level, LogLevel::Warn);
        assert_eq!(error!(logger, "e").await.level, LogLevel::Error);
        assert_eq!(fatal!(logger, "f").await.level, LogLevel::Fatal);
        assert_eq!(audit!(logger, "a").await.level, LogLevel::Audit);
        assert_eq!(log!(logger, LogLevel::Info, "i").await.level, LogLevel::Info);
    }

    #[tokio::test]
    async fn test_dispatch_macro_keeps_existing_caller() {
        let logger = logger();
        let mut entry = LogEntry::new(LogLevel::Info, "pre-located");
        entry.add_caller_info(crate::core::CallerInfo::new("elsewhere", "other.rs", 3));

        dispatch!(logger, entry).await;

        assert_eq!(entry.caller_info.map(|c| c.line_number), Some(3));
    }
}

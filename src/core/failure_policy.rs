//! What happens to provider write failures
//!
//! Dispatch never surfaces a failed, panicked or timed-out provider write to
//! the caller. The policy only decides whether anyone else hears about it.

use super::error::LoggerError;
use super::log_entry::LogEntry;
use std::fmt;
use std::sync::Arc;

/// Callback invoked for every failed provider write
///
/// Receives the entry as the provider saw it and the contained error. It runs
/// on the dispatching task, so keep it short and non-blocking.
pub type WriteFailureCallback = Arc<dyn Fn(&LogEntry, &LoggerError) + Send + Sync>;

/// Callback invoked after enrichment, before any provider write
pub type PreLogHook = Arc<dyn Fn(&LogEntry) + Send + Sync>;

/// Policy for reporting contained provider failures
///
/// # Example
///
/// ```
/// use log_dispatch::{FailurePolicy, LogEntry, LoggerError};
/// use std::sync::Arc;
///
/// // Default: failures are swallowed
/// let policy = FailurePolicy::default();
///
/// // Forward failures to a fallback channel
/// let policy = FailurePolicy::Callback(Arc::new(|entry: &LogEntry, err: &LoggerError| {
///     eprintln!("lost entry {:?}: {}", entry.unique_id, err);
/// }));
/// ```
#[derive(Clone, Default)]
pub enum FailurePolicy {
    /// Discard failures silently
    #[default]
    Ignore,

    /// Report each failure on stderr
    Stderr,

    /// Hand each failure to a callback
    Callback(WriteFailureCallback),
}

impl FailurePolicy {
    pub(crate) fn report(&self, entry: &LogEntry, error: &LoggerError) {
        match self {
            FailurePolicy::Ignore => {}
            FailurePolicy::Stderr => {
                eprintln!(
                    "[LOGGER ERROR] Dropped {} entry {}: {}",
                    entry.level,
                    entry.unique_id.as_deref().unwrap_or("<no id>"),
                    error
                );
            }
            FailurePolicy::Callback(callback) => callback(entry, error),
        }
    }
}

impl fmt::Debug for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Ignore => write!(f, "Ignore"),
            FailurePolicy::Stderr => write!(f, "Stderr"),
            FailurePolicy::Callback(_) => write!(f, "Callback"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_is_ignore() {
        assert!(matches!(FailurePolicy::default(), FailurePolicy::Ignore));
    }

    #[test]
    fn test_display() {
        assert_eq!(FailurePolicy::Ignore.to_string(), "Ignore");
        assert_eq!(FailurePolicy::Stderr.to_string(), "Stderr");
        assert_eq!(
            FailurePolicy::Callback(Arc::new(|_: &LogEntry, _: &LoggerError| {})).to_string(),
            "Callback"
        );
    }

    #[test]
    fn test_callback_receives_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let policy = FailurePolicy::Callback(Arc::new(move |entry: &LogEntry, err: &LoggerError| {
            assert_eq!(entry.message, "lost");
            assert!(matches!(err, LoggerError::ProviderWrite { .. }));
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let entry = LogEntry::new(LogLevel::Error, "lost");
        policy.report(&entry, &LoggerError::provider_write("file", "disk full"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

//! Log provider trait for output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};
use async_trait::async_trait;

/// A destination that records dispatched entries
///
/// The logger writes one entry to many providers at once, so `write` takes
/// `&self` and must tolerate concurrent calls for distinct entries.
///
/// # Example
///
/// ```
/// use log_dispatch::core::{LogEntry, LogLevel, LogProvider, Result};
/// use async_trait::async_trait;
///
/// struct StdoutProvider;
///
/// #[async_trait]
/// impl LogProvider for StdoutProvider {
///     async fn write(&self, entry: &LogEntry) -> Result<()> {
///         println!("{} {}", entry.level, entry.message);
///         Ok(())
///     }
///
///     fn logging_level(&self) -> LogLevel {
///         LogLevel::Info
///     }
///
///     fn name(&self) -> &str {
///         "stdout"
///     }
/// }
/// ```
#[async_trait]
pub trait LogProvider: Send + Sync {
    /// Record an enriched entry
    async fn write(&self, entry: &LogEntry) -> Result<()>;

    /// Minimum level this provider records
    fn logging_level(&self) -> LogLevel;

    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Whether an entry at `level` should be written to this provider
    #[inline]
    fn accepts(&self, level: LogLevel) -> bool {
        level >= self.logging_level()
    }
}

//! Provider that discards everything

use crate::core::{LogEntry, LogLevel, LogProvider, Result};
use async_trait::async_trait;

/// Accepts every entry at or above its level and drops it
///
/// Handy as a placeholder audit destination, in benchmarks, and wherever a
/// logger is required but output is not.
#[derive(Debug, Clone, Copy)]
pub struct NullLogProvider {
    level: LogLevel,
}

impl NullLogProvider {
    /// A sink that accepts every level
    pub const fn new() -> Self {
        Self { level: LogLevel::Trace }
    }

    pub const fn with_level(level: LogLevel) -> Self {
        Self { level }
    }
}

impl Default for NullLogProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogProvider for NullLogProvider {
    async fn write(&self, _entry: &LogEntry) -> Result<()> {
        Ok(())
    }

    fn logging_level(&self) -> LogLevel {
        self.level
    }

    fn name(&self) -> &str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discards_without_error() {
        let provider = NullLogProvider::new();
        let entry = LogEntry::new(LogLevel::Fatal, "gone");
        assert!(tokio_test::block_on(provider.write(&entry)).is_ok());
        assert!(provider.accepts(LogLevel::Trace));
    }

    #[test]
    fn test_with_level() {
        let provider = NullLogProvider::with_level(LogLevel::Error);
        assert!(!provider.accepts(LogLevel::Warn));
        assert!(provider.accepts(LogLevel::Audit));
    }
}

//! File provider
//!
//! Appends one formatted line per entry using `tokio::fs`.

use crate::core::{LogEntry, LogLevel, LogProvider, LoggerError, OutputFormat, Result, TimestampFormat};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

/// Appends entries to a file
///
/// Writes from concurrent dispatches are serialized through an async mutex,
/// so lines never interleave. With `auto_flush` disabled, call
/// [`flush`](FileProvider::flush) before dropping the provider or buffered
/// lines are lost.
///
/// # Example
///
/// ```no_run
/// use log_dispatch::prelude::*;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<()> {
/// let file = FileProvider::new("logs/app.log", LogLevel::Info)
///     .await?
///     .with_output_format(OutputFormat::Json);
///
/// let logger = Logger::builder()
///     .configuration(LoggerConfiguration::default())
///     .provider(Arc::new(file))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct FileProvider {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    level: LogLevel,
    auto_flush: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl FileProvider {
    /// Default buffer size (64 KB)
    pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

    /// Open (or create) `path` for appending
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an `IoOperation` error if the directory or file cannot be created.
    pub async fn new(path: impl AsRef<Path>, level: LogLevel) -> Result<Self> {
        Self::with_buffer_size(path, level, Self::DEFAULT_BUFFER_SIZE).await
    }

    /// Open `path` with a custom write buffer size
    ///
    /// # Errors
    ///
    /// Returns an `IoOperation` error if the directory or file cannot be created.
    pub async fn with_buffer_size(
        path: impl AsRef<Path>,
        level: LogLevel,
        buffer_size: usize,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    parent.display().to_string(),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| LoggerError::io_operation("opening log file", path.display().to_string(), e))?;

        Ok(Self {
            writer: Mutex::new(BufWriter::with_capacity(buffer_size, file)),
            path,
            level,
            auto_flush: true,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        })
    }

    /// Flush after every entry (default: enabled)
    #[must_use]
    pub fn with_auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = auto_flush;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format for this provider
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use log_dispatch::prelude::*;
    ///
    /// # async fn example() -> Result<()> {
    /// let provider = FileProvider::new("/var/log/app.log", LogLevel::Info)
    ///     .await?
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write any buffered lines to disk
    ///
    /// # Errors
    ///
    /// Returns an `IoOperation` error if the flush fails.
    pub async fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .await
            .flush()
            .await
            .map_err(|e| LoggerError::io_operation("flushing log file", self.path.display().to_string(), e))
    }
}

#[async_trait]
impl LogProvider for FileProvider {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let mut line = self.output_format.format(entry, &self.timestamp_format);
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| LoggerError::provider_write(self.name(), e.to_string()))?;

        if self.auto_flush {
            writer
                .flush()
                .await
                .map_err(|e| LoggerError::provider_write(self.name(), e.to_string()))?;
        }
        Ok(())
    }

    fn logging_level(&self) -> LogLevel {
        self.level
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_creates_missing_directories() {
        let dir = tempdir().expect("Failed to create temp dir");
        let log_path = dir.path().join("nested").join("deeper").join("app.log");

        let provider = FileProvider::new(&log_path, LogLevel::Info)
            .await
            .expect("Failed to create provider");

        assert_eq!(provider.path(), log_path.as_path());
        assert!(log_path.exists());
    }

    #[tokio::test]
    async fn test_write_appends_lines() {
        let dir = tempdir().expect("Failed to create temp dir");
        let log_path = dir.path().join("app.log");
        let provider = FileProvider::new(&log_path, LogLevel::Info).await.unwrap();

        for i in 0..10 {
            let entry = LogEntry::new(LogLevel::Info, format!("Message {}", i)).with_application_id("svc");
            provider.write(&entry).await.expect("Failed to write");
        }

        let content = tokio::fs::read_to_string(&log_path).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[3].contains("svc"));
        assert!(lines[3].contains("Message 3"));
    }

    #[tokio::test]
    async fn test_buffered_writes_need_flush() {
        let dir = tempdir().expect("Failed to create temp dir");
        let log_path = dir.path().join("buffered.log");
        let provider = FileProvider::new(&log_path, LogLevel::Info)
            .await
            .unwrap()
            .with_auto_flush(false)
            .with_output_format(OutputFormat::Json);

        provider.write(&LogEntry::new(LogLevel::Warn, "held back")).await.unwrap();
        assert!(tokio::fs::read_to_string(&log_path).await.unwrap().is_empty());

        provider.flush().await.unwrap();
        let content = tokio::fs::read_to_string(&log_path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["message"], "held back");
    }

    #[tokio::test]
    async fn test_reopen_appends() {
        let dir = tempdir().expect("Failed to create temp dir");
        let log_path = dir.path().join("app.log");

        for message in ["first", "second"] {
            let provider = FileProvider::new(&log_path, LogLevel::Info).await.unwrap();
            provider.write(&LogEntry::new(LogLevel::Info, message)).await.unwrap();
        }

        let content = tokio::fs::read_to_string(&log_path).await.unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}

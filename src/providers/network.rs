//! Network provider for remote logging
//!
//! Sends one formatted line per entry to a TCP collector. Useful for
//! centralized logging in distributed systems.

use crate::core::{LogEntry, LogLevel, LogProvider, LoggerError, OutputFormat, Result, TimestampFormat};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Streams entries to a remote TCP server
///
/// The connection is opened on the first write. When a write fails the
/// provider reconnects once and resends before reporting the error.
///
/// # Example
///
/// ```no_run
/// use log_dispatch::providers::NetworkProvider;
/// use log_dispatch::prelude::*;
/// use std::sync::Arc;
///
/// let collector = NetworkProvider::new("127.0.0.1:5140", LogLevel::Warn)
///     .with_output_format(OutputFormat::Json);
///
/// let logger = Logger::builder()
///     .configuration(LoggerConfiguration::default())
///     .provider(Arc::new(collector))
///     .build()
///     .expect("valid logger");
/// ```
pub struct NetworkProvider {
    address: String,
    stream: Mutex<Option<TcpStream>>,
    level: LogLevel,
    reconnect_on_error: bool,
    connect_timeout: Duration,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl NetworkProvider {
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a provider for `address` (e.g. "localhost:8080")
    ///
    /// No connection is made until the first entry is written.
    pub fn new(address: impl Into<String>, level: LogLevel) -> Self {
        Self {
            address: address.into(),
            stream: Mutex::new(None),
            level,
            reconnect_on_error: true,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// Enable or disable the single reconnect attempt after a failed send
    ///
    /// Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&self) -> Result<TcpStream> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.address))
            .await
            .map_err(|_| {
                LoggerError::provider_write(
                    self.name(),
                    format!("connecting to {} timed out", self.address),
                )
            })?
            .map_err(|e| LoggerError::io_operation("connecting to log server", self.address.clone(), e))?;

        // Low latency over batching
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    /// Whether a connection is cached for the next write
    pub async fn is_connected(&self) -> bool {
        self.stream.lock().await.is_some()
    }

    async fn send(&self, slot: &mut Option<TcpStream>, payload: &[u8]) -> Result<()> {
        // The slot stays empty while a line is in flight. A write cancelled
        // halfway drops its connection instead of caching a torn line.
        let mut connection = match slot.take() {
            Some(connection) => connection,
            None => self.connect().await?,
        };

        connection
            .write_all(payload)
            .await
            .map_err(|e| LoggerError::provider_write(self.name(), e.to_string()))?;

        *slot = Some(connection);
        Ok(())
    }
}

#[async_trait]
impl LogProvider for NetworkProvider {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let mut line = self.output_format.format(entry, &self.timestamp_format);
        line.push('\n');

        let mut stream = self.stream.lock().await;
        match self.send(&mut stream, line.as_bytes()).await {
            Ok(()) => Ok(()),
            Err(first) if self.reconnect_on_error => {
                self.send(&mut stream, line.as_bytes()).await.map_err(|retry| {
                    LoggerError::provider_write(
                        self.name(),
                        format!("{} (reconnect: {})", first, retry),
                    )
                })
            }
            Err(first) => Err(first),
        }
    }

    fn logging_level(&self) -> LogLevel {
        self.level
    }

    fn name(&self) -> &str {
        "network"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_write_without_server_fails() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let provider = NetworkProvider::new(address, LogLevel::Info).with_reconnect(false);
        let result = provider.write(&LogEntry::new(LogLevel::Info, "nobody home")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_lines_reach_the_collector() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let collector = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut lines = BufReader::new(socket).lines();
            let mut received = Vec::new();
            while received.len() < 2 {
                match lines.next_line().await.unwrap() {
                    Some(line) => received.push(line),
                    None => break,
                }
            }
            received
        });

        let provider = NetworkProvider::new(address, LogLevel::Info).with_output_format(OutputFormat::Json);
        provider.write(&LogEntry::new(LogLevel::Info, "one")).await.unwrap();
        provider.write(&LogEntry::new(LogLevel::Error, "two")).await.unwrap();

        let received = collector.await.unwrap();
        assert_eq!(received.len(), 2);
        let second: serde_json::Value = serde_json::from_str(&received[1]).unwrap();
        assert_eq!(second["message"], "two");
    }

    #[tokio::test]
    async fn test_cancelled_write_drops_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        // Accept but never read, so a large line cannot be fully sent
        let collector = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let provider = NetworkProvider::new(address, LogLevel::Info).with_reconnect(false);
        provider.write(&LogEntry::new(LogLevel::Info, "small")).await.unwrap();
        assert!(provider.is_connected().await);

        let oversized = LogEntry::new(LogLevel::Info, "x".repeat(64 * 1024 * 1024));
        let outcome = tokio::time::timeout(Duration::from_millis(200), provider.write(&oversized)).await;
        assert!(outcome.is_err(), "write should still be blocked on a full socket");

        assert!(!provider.is_connected().await);
        collector.abort();
    }
}

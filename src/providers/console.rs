//! Console provider implementation

use crate::core::{LogEntry, LogLevel, LogProvider, OutputFormat, Result, TimestampFormat};
use async_trait::async_trait;
use colored::Colorize;

/// Writes entries to stdout, or stderr for `Error` and `Fatal`
pub struct ConsoleProvider {
    level: LogLevel,
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleProvider {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the output format for this provider
    ///
    /// # Example
    ///
    /// ```
    /// use log_dispatch::providers::ConsoleProvider;
    /// use log_dispatch::{LogLevel, OutputFormat};
    ///
    /// let provider = ConsoleProvider::new(LogLevel::Info)
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format for this provider
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    ///
    /// # Examples
    ///
    /// ```
    /// use log_dispatch::providers::ConsoleProvider;
    /// use log_dispatch::LogLevel;
    ///
    /// let provider = ConsoleProvider::new(LogLevel::Debug)
    ///     .with_custom_timestamp("%d/%b/%Y:%H:%M:%S %z");
    /// ```
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.output_format {
            OutputFormat::Text if self.use_colors => self.format_colored_text(entry),
            _ => self.output_format.format(entry, &self.timestamp_format),
        }
    }

    /// Text layout with the level tag colored
    fn format_colored_text(&self, entry: &LogEntry) -> String {
        let plain = OutputFormat::Text.format(entry, &self.timestamp_format);
        let tag = format!("[{:5}]", entry.level.to_str());
        let colored_tag = tag.color(entry.level.color_code()).to_string();
        plain.replacen(&tag, &colored_tag, 1)
    }
}

impl Default for ConsoleProvider {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[async_trait]
impl LogProvider for ConsoleProvider {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let output = self.render(entry);

        match entry.level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn logging_level(&self) -> LogLevel {
        self.level
    }

    fn name(&self) -> &str {
        "console"
    }
}

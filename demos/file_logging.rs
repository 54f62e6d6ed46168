//! File logging example
//!
//! Demonstrates fanning out to a console provider and a JSON file provider
//! with different minimum levels.
//!
//! Run with: cargo run --example file_logging

use log_dispatch::prelude::*;
use log_dispatch::{debug, error, info, warn};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Log Dispatch - File Logging Example ===\n");

    let file = Arc::new(
        FileProvider::new("logs/application.log", LogLevel::Info)
            .await?
            .with_output_format(OutputFormat::Json)
            .with_auto_flush(false),
    );

    let logger = Logger::builder()
        .configuration(LoggerConfiguration::new(true, LogLevel::Debug).with_application_id("file-demo"))
        .provider(Arc::new(ConsoleProvider::new(LogLevel::Debug).with_colors(false)))
        .provider(file.clone())
        .build()?;

    println!("1. Console gets DEBUG and above, the file INFO and above:");
    info!(logger, "Application started").await;
    debug!(logger, "Loading configuration...").await;
    warn!(logger, "Using default settings for some options").await;
    error!(logger, "Failed to load optional plugin").await;

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        let mut entry = LogEntry::new(LogLevel::Info, format!("Processing item {}/5", i)).with_field("item", i);
        logger.log_async(&mut entry, log_dispatch::caller_info!()).await;
        if i == 3 {
            warn!(logger, "Item 3 took longer than expected").await;
        }
    }

    // Buffered lines are lost unless flushed
    file.flush().await?;

    println!("\nLog file written to: {}", file.path().display());
    println!("\n=== Example completed successfully! ===");
    Ok(())
}

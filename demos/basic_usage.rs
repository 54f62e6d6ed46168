//! Basic dispatcher usage example
//!
//! Demonstrates building a logger, level gating, the logging macros and
//! shared context fields.
//!
//! Run with: cargo run --example basic_usage

use log_dispatch::prelude::*;
use log_dispatch::{debug, error, info, trace, warn};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Log Dispatch - Basic Usage Example ===\n");

    let shared = LoggerContext::new();
    shared.set("service", "basic-demo");

    let logger = Logger::builder()
        .configuration(LoggerConfiguration::new(true, LogLevel::Debug).with_application_id("basic-demo"))
        .provider(Arc::new(ConsoleProvider::new(LogLevel::Trace)))
        .context_provider(Arc::new(shared.clone()))
        .failure_policy(FailurePolicy::Stderr)
        .build()?;

    println!("1. Logging at different levels (threshold DEBUG):");
    trace!(logger, "This is a trace message (hidden)").await;
    debug!(logger, "This is a debug message").await;
    info!(logger, "This is an info message").await;
    warn!(logger, "This is a warning message").await;
    error!(logger, "This is an error message").await;

    println!("\n2. Checking the gate before building expensive entries:");
    if logger.is_enabled(LogLevel::Trace) {
        trace!(logger, "Expensive diagnostics: {:?}", vec![1, 2, 3]).await;
    } else {
        println!("   TRACE is disabled, skipped building the entry");
    }

    println!("\n3. Scoped context fields:");
    {
        let _request = shared.scoped("request_id", "req-7f3e");
        info!(logger, "Handling request").await;
    }
    info!(logger, "Request finished").await;

    println!("\n4. Pre-built entry with fields and error details:");
    let mut entry = LogEntry::new(LogLevel::Error, "Payment declined")
        .with_field("order_id", 1001)
        .with_exception("card expired");
    logger.log_async(&mut entry, log_dispatch::caller_info!()).await;
    println!("   Dispatched with unique id {}", entry.unique_id.as_deref().unwrap_or("-"));

    let metrics = logger.metrics();
    println!(
        "\nDispatched: {}, filtered: {}, failed writes: {}",
        metrics.dispatched_count(),
        metrics.filtered_count(),
        metrics.writes_failed()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}

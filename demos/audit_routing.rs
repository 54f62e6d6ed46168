//! Audit routing example
//!
//! Audit entries bypass the enablement switch and throttling and go only to
//! the dedicated audit provider. Regular entries never reach it.
//!
//! Run with: cargo run --example audit_routing

use async_trait::async_trait;
use log_dispatch::prelude::*;
use log_dispatch::{audit, info};
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps audit records in memory, standing in for a tamper-evident store
#[derive(Default)]
struct AuditTrail {
    records: Mutex<Vec<String>>,
}

#[async_trait]
impl LogProvider for AuditTrail {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        self.records.lock().push(OutputFormat::Json.format(entry, &TimestampFormat::Rfc3339));
        Ok(())
    }

    fn logging_level(&self) -> LogLevel {
        LogLevel::Audit
    }

    fn name(&self) -> &str {
        "audit-trail"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Log Dispatch - Audit Routing Example ===\n");

    let trail = Arc::new(AuditTrail::default());

    // Regular logging switched off entirely
    let logger = Logger::builder()
        .configuration(LoggerConfiguration::disabled().with_application_id("audit-demo"))
        .provider(Arc::new(ConsoleProvider::new(LogLevel::Trace)))
        .audit_provider(trail.clone())
        .pre_log_hook(Arc::new(|entry: &LogEntry| {
            println!("   about to dispatch {} ({})", entry.level, entry.message);
        }))
        .build()?;

    println!("1. Regular entry with logging disabled:");
    info!(logger, "This is dropped by the gate").await;

    println!("\n2. Audit entries:");
    audit!(logger, "User {} exported the customer list", "alice").await;
    audit!(logger, "Role 'admin' granted to {}", "bob").await;

    println!("\nAudit trail:");
    for record in trail.records.lock().iter() {
        println!("   {}", record);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}

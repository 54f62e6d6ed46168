//! Dispatch metrics for observability
//!
//! Counters describing what the logger did with the entries it was handed:
//! how many passed the gate, how many were filtered, and how provider writes
//! turned out.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use log_dispatch::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_write_succeeded();
///
/// assert_eq!(metrics.dispatched_count(), 1);
/// assert_eq!(metrics.failure_rate(), 0.0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries that passed the gate and were routed to providers
    dispatched: AtomicU64,

    /// Entries rejected by the level gate or a throttling rule
    filtered: AtomicU64,

    /// Provider writes that completed successfully
    writes_succeeded: AtomicU64,

    /// Provider writes that returned an error or panicked
    writes_failed: AtomicU64,

    /// Provider writes abandoned at the deadline
    writes_timed_out: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            writes_succeeded: AtomicU64::new(0),
            writes_failed: AtomicU64::new(0),
            writes_timed_out: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes_succeeded(&self) -> u64 {
        self.writes_succeeded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes_failed(&self) -> u64 {
        self.writes_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes_timed_out(&self) -> u64 {
        self.writes_timed_out.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_succeeded(&self) -> u64 {
        self.writes_succeeded.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failed(&self) -> u64 {
        self.writes_failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_timed_out(&self) -> u64 {
        self.writes_timed_out.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed and timed-out writes as a percentage of all writes (0.0 - 100.0)
    ///
    /// Returns 0.0 if no writes have been attempted.
    pub fn failure_rate(&self) -> f64 {
        let failed = (self.writes_failed() + self.writes_timed_out()) as f64;
        let total = self.writes_succeeded() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.writes_succeeded.store(0, Ordering::Relaxed);
        self.writes_failed.store(0, Ordering::Relaxed);
        self.writes_timed_out.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched_count()),
            filtered: AtomicU64::new(self.filtered_count()),
            writes_succeeded: AtomicU64::new(self.writes_succeeded()),
            writes_failed: AtomicU64::new(self.writes_failed()),
            writes_timed_out: AtomicU64::new(self.writes_timed_out()),
        }
    }
}

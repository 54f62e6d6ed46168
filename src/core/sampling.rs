//! Sampling-based throttling for high-volume logging
//!
//! [`LogSampler`] is a [`ThrottlingRuleEvaluator`]: register it with a logger
//! to thin out noisy entries while letting configured levels (by default
//! `Error` and `Fatal`) through untouched. Audit entries never reach it.
//!
//! # Example
//!
//! ```
//! use log_dispatch::prelude::*;
//!
//! let sampler = LogSampler::new(
//!     SamplingConfig::new(0.1)
//!         .with_always_sample(vec![LogLevel::Warn, LogLevel::Error, LogLevel::Fatal])
//!         .with_category_rate("healthcheck", 0.0),
//! );
//!
//! let noisy = LogEntry::new(LogLevel::Info, "ping").with_field("category", "healthcheck");
//! assert!(!sampler.should_log(&noisy));
//! assert!(sampler.should_log(&LogEntry::new(LogLevel::Error, "payment failed")));
//! ```

use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::throttling::ThrottlingRuleEvaluator;
use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Extended-property key read as the sampling category by default
pub const DEFAULT_CATEGORY_FIELD: &str = "category";

const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Configuration for log sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Fraction of entries kept, between 0.0 and 1.0
    pub rate: f64,

    /// Levels that are never sampled out
    pub always_sample: Vec<LogLevel>,

    /// Per-category rates, overriding `rate`
    pub category_rates: HashMap<String, f64>,

    /// Extended-property key holding an entry's category
    pub category_field: String,

    /// Lower the rate automatically when throughput exceeds `adaptive_threshold`
    pub adaptive: bool,

    /// Entries per second above which adaptive sampling kicks in
    pub adaptive_threshold: usize,

    /// Floor for the adaptive rate
    pub adaptive_min_rate: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            always_sample: vec![LogLevel::Error, LogLevel::Fatal],
            category_rates: HashMap::new(),
            category_field: DEFAULT_CATEGORY_FIELD.to_string(),
            adaptive: false,
            adaptive_threshold: 10_000,
            adaptive_min_rate: 0.01,
        }
    }
}

impl SamplingConfig {
    /// Create a config keeping `rate` of all entries (clamped to 0.0..=1.0)
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_always_sample(mut self, levels: Vec<LogLevel>) -> Self {
        self.always_sample = levels;
        self
    }

    #[must_use]
    pub fn with_category_rate(mut self, category: impl Into<String>, rate: f64) -> Self {
        self.category_rates.insert(category.into(), rate.clamp(0.0, 1.0));
        self
    }

    #[must_use]
    pub fn with_category_field(mut self, field: impl Into<String>) -> Self {
        self.category_field = field.into();
        self
    }

    #[must_use]
    pub fn with_adaptive(mut self, threshold: usize, min_rate: f64) -> Self {
        self.adaptive = true;
        self.adaptive_threshold = threshold;
        self.adaptive_min_rate = min_rate.clamp(0.0, 1.0);
        self
    }
}

/// Counters describing what the sampler kept and dropped
#[derive(Debug, Default)]
pub struct SamplerMetrics {
    sampled_count: AtomicU64,
    dropped_count: AtomicU64,
}

impl SamplerMetrics {
    pub const fn new() -> Self {
        Self {
            sampled_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn sampled_count(&self) -> u64 {
        self.sampled_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.sampled_count() + self.dropped_count()
    }

    /// Observed fraction of entries kept; 1.0 before anything was seen
    pub fn effective_sample_rate(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            1.0
        } else {
            self.sampled_count() as f64 / total as f64
        }
    }

    pub fn reset(&self) {
        self.sampled_count.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
    }

    fn record(&self, sampled: bool) -> bool {
        let counter = if sampled {
            &self.sampled_count
        } else {
            &self.dropped_count
        };
        counter.fetch_add(1, Ordering::Relaxed);
        sampled
    }
}

/// Throughput measured over fixed one-second windows
#[derive(Debug)]
struct RateWindow {
    started: Instant,
    count: u64,
    last_rate: f64,
}

impl RateWindow {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            count: 0,
            last_rate: 0.0,
        }
    }

    /// Count one entry and return the rate of the last completed window,
    /// or the running rate while the first window is still open
    fn record(&mut self) -> f64 {
        self.count += 1;
        let elapsed = self.started.elapsed();
        if elapsed >= RATE_WINDOW {
            self.last_rate = self.count as f64 / elapsed.as_secs_f64();
            self.started = Instant::now();
            self.count = 0;
        } else if self.last_rate == 0.0 && elapsed > Duration::ZERO {
            return self.count as f64 / elapsed.as_secs_f64().max(RATE_WINDOW.as_secs_f64() / 10.0);
        }
        self.last_rate
    }
}

/// Random, category-aware and optionally adaptive sampler
pub struct LogSampler {
    config: SamplingConfig,
    metrics: SamplerMetrics,
    window: Mutex<RateWindow>,
}

impl LogSampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            metrics: SamplerMetrics::new(),
            window: Mutex::new(RateWindow::new()),
        }
    }

    /// Decide for a level and optional category
    pub fn should_sample(&self, level: LogLevel, category: Option<&str>) -> bool {
        if self.config.always_sample.contains(&level) {
            return self.metrics.record(true);
        }

        let rate = self.effective_rate(category);
        let sampled = if rate >= 1.0 {
            true
        } else if rate <= 0.0 {
            false
        } else {
            rand::thread_rng().gen::<f64>() < rate
        };
        self.metrics.record(sampled)
    }

    fn effective_rate(&self, category: Option<&str>) -> f64 {
        if let Some(rate) = category.and_then(|c| self.config.category_rates.get(c)) {
            return *rate;
        }

        if self.config.adaptive {
            let throughput = self.window.lock().record();
            let threshold = self.config.adaptive_threshold as f64;
            if throughput > threshold {
                return (self.config.rate * threshold / throughput).max(self.config.adaptive_min_rate);
            }
        }

        self.config.rate
    }

    pub fn metrics(&self) -> &SamplerMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }
}

impl ThrottlingRuleEvaluator for LogSampler {
    fn should_log(&self, entry: &LogEntry) -> bool {
        let category = entry
            .extended_properties
            .get(&self.config.category_field)
            .and_then(|value| value.as_str());
        self.should_sample(entry.level, category)
    }
}

impl std::fmt::Debug for LogSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSampler")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rate_is_clamped() {
        assert_eq!(SamplingConfig::new(1.5).rate, 1.0);
        assert_eq!(SamplingConfig::new(-0.5).rate, 0.0);
        assert_eq!(SamplingConfig::new(0.5).category_field, DEFAULT_CATEGORY_FIELD);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SamplingConfig =
            serde_json::from_str(r#"{"rate": 0.25, "category_rates": {"db": 0.0}}"#).unwrap();
        assert_eq!(config.rate, 0.25);
        assert_eq!(config.category_rates.get("db"), Some(&0.0));
        assert!(config.always_sample.contains(&LogLevel::Error));
    }

    #[test]
    fn test_always_sample_levels_pass_at_zero_rate() {
        let sampler = LogSampler::new(SamplingConfig::new(0.0));

        assert!(sampler.should_sample(LogLevel::Error, None));
        assert!(sampler.should_sample(LogLevel::Fatal, None));
        for _ in 0..10 {
            assert!(!sampler.should_sample(LogLevel::Info, None));
        }
        assert_eq!(sampler.metrics().dropped_count(), 10);
    }

    #[test]
    fn test_effective_sample_rate() {
        let sampler = LogSampler::new(SamplingConfig::new(0.0));
        assert_eq!(sampler.metrics().effective_sample_rate(), 1.0);

        sampler.should_sample(LogLevel::Error, None);
        for _ in 0..3 {
            sampler.should_sample(LogLevel::Debug, None);
        }
        assert_eq!(sampler.metrics().total_count(), 4);
        assert_eq!(sampler.metrics().effective_sample_rate(), 0.25);

        sampler.metrics().reset();
        assert_eq!(sampler.metrics().effective_sample_rate(), 1.0);
    }

    #[test]
    fn test_category_read_from_entry() {
        let sampler = LogSampler::new(SamplingConfig::new(1.0).with_category_rate("noisy", 0.0));

        let noisy = LogEntry::new(LogLevel::Info, "tick").with_field("category", "noisy");
        let normal = LogEntry::new(LogLevel::Info, "order placed");

        assert!(!sampler.should_log(&noisy));
        assert!(sampler.should_log(&normal));
    }

    #[test]
    fn test_custom_category_field() {
        let sampler = LogSampler::new(
            SamplingConfig::new(1.0)
                .with_category_field("component")
                .with_category_rate("poller", 0.0),
        );
        let entry = LogEntry::new(LogLevel::Debug, "poll").with_field("component", "poller");
        assert!(!sampler.should_log(&entry));
    }

    #[test]
    fn test_statistical_rate() {
        let sampler = LogSampler::new(SamplingConfig::new(0.5));
        let total = 10_000;
        let sampled = (0..total)
            .filter(|_| sampler.should_sample(LogLevel::Info, None))
            .count();

        let rate = sampled as f64 / total as f64;
        assert!((0.45..=0.55).contains(&rate), "Expected ~50%, got {}", rate);
        assert_eq!(sampler.metrics().total_count(), total as u64);
    }

    #[test]
    fn test_adaptive_sampling_never_below_floor() {
        let sampler = LogSampler::new(SamplingConfig::new(1.0).with_adaptive(10, 0.2));
        for _ in 0..5_000 {
            sampler.should_sample(LogLevel::Info, None);
        }
        // Under heavy load the rate drops, but the 20% floor keeps some entries.
        let kept = sampler.metrics().sampled_count();
        assert!(kept > 0);
        assert!(kept < 5_000);
    }
}

//! The dispatcher: gatekeeping, enrichment, routing and concurrent fan-out

use super::{
    application_id::{application_id_from_executable, ApplicationIdProvider},
    caller_info::CallerInfo,
    config::LoggerConfiguration,
    context_provider::ContextProvider,
    error::{LoggerError, Result},
    failure_policy::{FailurePolicy, PreLogHook, WriteFailureCallback},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    provider::LogProvider,
    throttling::{NullThrottlingRuleEvaluator, ThrottlingRuleEvaluator},
};
use futures::future::{join_all, select, Either, FutureExt};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Sleep;
use uuid::Uuid;

/// Pluggable log dispatcher
///
/// A `Logger` is read-only after it is built and can be shared (for example
/// behind an `Arc`) by any number of concurrent callers. Each call to
/// [`log_async`](Logger::log_async) owns the entry it dispatches.
///
/// # Example
///
/// ```
/// use log_dispatch::prelude::*;
/// use std::sync::Arc;
///
/// # async fn run() -> Result<()> {
/// let logger = Logger::builder()
///     .configuration(LoggerConfiguration::new(true, LogLevel::Debug))
///     .provider(Arc::new(NullLogProvider::new()))
///     .build()?;
///
/// let mut entry = LogEntry::new(LogLevel::Info, "order placed");
/// logger.log_async(&mut entry, log_dispatch::caller_info!()).await;
/// assert!(entry.unique_id.is_some());
/// # Ok(())
/// # }
/// ```
pub struct Logger {
    configuration: LoggerConfiguration,
    providers: Vec<Arc<dyn LogProvider>>,
    application_id: String,
    audit_provider: Option<Arc<dyn LogProvider>>,
    throttling: Arc<dyn ThrottlingRuleEvaluator>,
    context_providers: Vec<Arc<dyn ContextProvider>>,
    pre_log_hook: Option<PreLogHook>,
    failure_policy: FailurePolicy,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Build a logger from its collaborators
    ///
    /// The provider collection is drained into a vector here, once, so the
    /// dispatch path only ever iterates a realized list.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `providers` yields nothing, `InvalidConfiguration`
    /// if the configuration does not validate.
    pub fn new<I>(
        configuration: LoggerConfiguration,
        providers: I,
        application_id_provider: Option<Arc<dyn ApplicationIdProvider>>,
        audit_provider: Option<Arc<dyn LogProvider>>,
        throttling: Option<Arc<dyn ThrottlingRuleEvaluator>>,
        context_providers: Vec<Arc<dyn ContextProvider>>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn LogProvider>>,
    {
        configuration.validate()?;

        let providers: Vec<_> = providers.into_iter().collect();
        if providers.is_empty() {
            return Err(LoggerError::invalid_argument(
                "providers",
                "Must provide at least one log provider.",
            ));
        }

        let application_id = match application_id_provider {
            Some(provider) => provider.application_id(),
            None => configuration
                .application_id
                .clone()
                .unwrap_or_else(application_id_from_executable),
        };

        Ok(Self {
            configuration,
            providers,
            application_id,
            audit_provider,
            throttling: throttling.unwrap_or_else(|| Arc::new(NullThrottlingRuleEvaluator)),
            context_providers,
            pre_log_hook: None,
            failure_policy: FailurePolicy::default(),
            metrics: Arc::new(LoggerMetrics::new()),
        })
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Whether an entry at `level` would pass the level gate
    ///
    /// Ignores throttling and audit routing, so callers can use it to skip
    /// building entries that would be discarded anyway.
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.configuration.is_logging_enabled
            && level != LogLevel::NotSet
            && level >= self.configuration.logging_level
    }

    /// Enrich and dispatch an entry to the providers
    ///
    /// Never fails: entries rejected by the gate are dropped silently, and
    /// provider failures (errors, panics, timeouts) are contained and handed
    /// to the configured [`FailurePolicy`]. `Audit` entries skip the gate.
    ///
    /// The configured write timeout is enforced when dispatch runs on a Tokio
    /// runtime with timers enabled. Any other executor can drive it too, but
    /// writes then complete without a deadline.
    pub async fn log_async(&self, entry: &mut LogEntry, caller: CallerInfo) {
        if !entry.level.is_audit()
            && (!self.is_enabled(entry.level) || !self.throttling.should_log(entry))
        {
            self.metrics.record_filtered();
            return;
        }

        self.enrich(entry, caller);
        self.on_pre_log(entry);
        self.metrics.record_dispatched();

        let entry: &LogEntry = entry;
        let targets: Vec<&Arc<dyn LogProvider>> = match self.audit_provider {
            Some(ref audit) if entry.level.is_audit() => vec![audit],
            _ => self
                .providers
                .iter()
                .filter(|provider| provider.accepts(entry.level))
                .collect(),
        };

        // All writes are started before the single joint await.
        let writes = targets
            .into_iter()
            .map(|provider| self.write_to(&**provider, entry));
        for result in join_all(writes).await {
            match result {
                Ok(()) => {
                    self.metrics.record_write_succeeded();
                }
                Err(err) => {
                    if matches!(err, LoggerError::WriteTimeout { .. }) {
                        self.metrics.record_write_timed_out();
                    } else {
                        self.metrics.record_write_failed();
                    }
                    self.failure_policy.report(entry, &err);
                }
            }
        }
    }

    /// Take ownership of an entry, dispatch it, and hand it back enriched
    pub async fn log(&self, mut entry: LogEntry, caller: CallerInfo) -> LogEntry {
        self.log_async(&mut entry, caller).await;
        entry
    }

    fn enrich(&self, entry: &mut LogEntry, caller: CallerInfo) {
        if entry.has_blank_application_id() {
            entry.application_id = self.application_id.clone();
        }

        if entry.unique_id.as_deref().map_or(true, str::is_empty) {
            entry.unique_id = Some(Uuid::new_v4().to_string());
        }

        entry.add_caller_info(caller);

        for context_provider in &self.context_providers {
            context_provider.add_context_data(entry);
        }
    }

    /// Observation point between enrichment and the provider writes
    fn on_pre_log(&self, entry: &LogEntry) {
        if let Some(ref hook) = self.pre_log_hook {
            hook(entry);
        }
    }

    async fn write_to(&self, provider: &dyn LogProvider, entry: &LogEntry) -> Result<()> {
        let write = AssertUnwindSafe(provider.write(entry)).catch_unwind();

        let deadline = self
            .configuration
            .write_timeout
            .and_then(|timeout| start_deadline(timeout).map(|sleep| (timeout, sleep)));

        let outcome = match deadline {
            Some((timeout, sleep)) => match select(write, Box::pin(sleep)).await {
                Either::Left((outcome, _)) => outcome,
                Either::Right(_) => return Err(LoggerError::write_timeout(provider.name(), timeout)),
            },
            None => write.await,
        };

        outcome.unwrap_or_else(|panic| {
            Err(LoggerError::provider_panicked(
                provider.name(),
                panic_message(panic.as_ref()),
            ))
        })
    }

    pub fn configuration(&self) -> &LoggerConfiguration {
        &self.configuration
    }

    /// Application id stamped on entries that arrive without one
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn providers(&self) -> &[Arc<dyn LogProvider>] {
        &self.providers
    }

    pub fn audit_provider(&self) -> Option<&Arc<dyn LogProvider>> {
        self.audit_provider.as_ref()
    }

    pub fn failure_policy(&self) -> &FailurePolicy {
        &self.failure_policy
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("configuration", &self.configuration)
            .field("application_id", &self.application_id)
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("audit_provider", &self.audit_provider.as_ref().map(|p| p.name()))
            .field("context_providers", &self.context_providers.len())
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

/// Arm a write deadline on the ambient Tokio timer
///
/// Returns `None` outside a Tokio runtime and on runtimes built without the
/// time driver; writes then run unbounded.
fn start_deadline(timeout: Duration) -> Option<Sleep> {
    Handle::try_current().ok()?;
    std::panic::catch_unwind(|| tokio::time::sleep(timeout)).ok()
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use log_dispatch::prelude::*;
/// use std::sync::Arc;
///
/// let shared = LoggerContext::new();
/// shared.set("service", "checkout");
///
/// let logger = Logger::builder()
///     .configuration(LoggerConfiguration::new(true, LogLevel::Info))
///     .provider(Arc::new(ConsoleProvider::new(LogLevel::Info)))
///     .audit_provider(Arc::new(NullLogProvider::new()))
///     .context_provider(Arc::new(shared))
///     .failure_policy(FailurePolicy::Stderr)
///     .build()
///     .expect("valid logger");
/// ```
pub struct LoggerBuilder {
    configuration: Option<LoggerConfiguration>,
    providers: Vec<Arc<dyn LogProvider>>,
    application_id_provider: Option<Arc<dyn ApplicationIdProvider>>,
    audit_provider: Option<Arc<dyn LogProvider>>,
    throttling: Option<Arc<dyn ThrottlingRuleEvaluator>>,
    context_providers: Vec<Arc<dyn ContextProvider>>,
    pre_log_hook: Option<PreLogHook>,
    failure_policy: FailurePolicy,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            configuration: None,
            providers: Vec::new(),
            application_id_provider: None,
            audit_provider: None,
            throttling: None,
            context_providers: Vec::new(),
            pre_log_hook: None,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Set the configuration (required)
    #[must_use = "builder methods return a new value"]
    pub fn configuration(mut self, configuration: LoggerConfiguration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Add a regular provider
    #[must_use = "builder methods return a new value"]
    pub fn provider(mut self, provider: Arc<dyn LogProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Add several regular providers
    #[must_use = "builder methods return a new value"]
    pub fn providers<I>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn LogProvider>>,
    {
        self.providers.extend(providers);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn application_id_provider(mut self, provider: Arc<dyn ApplicationIdProvider>) -> Self {
        self.application_id_provider = Some(provider);
        self
    }

    /// Dedicated destination for `Audit` entries
    ///
    /// Without one, audit entries fan out to the regular providers.
    #[must_use = "builder methods return a new value"]
    pub fn audit_provider(mut self, provider: Arc<dyn LogProvider>) -> Self {
        self.audit_provider = Some(provider);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn throttling(mut self, evaluator: Arc<dyn ThrottlingRuleEvaluator>) -> Self {
        self.throttling = Some(evaluator);
        self
    }

    /// Register a context provider; providers run in registration order
    #[must_use = "builder methods return a new value"]
    pub fn context_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.context_providers.push(provider);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn pre_log_hook(mut self, hook: PreLogHook) -> Self {
        self.pre_log_hook = Some(hook);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Shorthand for `failure_policy(FailurePolicy::Callback(..))`
    #[must_use = "builder methods return a new value"]
    pub fn on_write_failure(self, callback: WriteFailureCallback) -> Self {
        self.failure_policy(FailurePolicy::Callback(callback))
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when no configuration was set or no provider was
    /// added; `InvalidConfiguration` when the configuration is invalid.
    pub fn build(self) -> Result<Logger> {
        let configuration = self.configuration.ok_or_else(|| {
            LoggerError::invalid_argument("configuration", "A logger configuration is required.")
        })?;

        let mut logger = Logger::new(
            configuration,
            self.providers,
            self.application_id_provider,
            self.audit_provider,
            self.throttling,
            self.context_providers,
        )?;
        logger.pre_log_hook = self.pre_log_hook;
        logger.failure_policy = self.failure_policy;
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StaticApplicationId;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingProvider {
        level: LogLevel,
        entries: Mutex<Vec<LogEntry>>,
    }

    impl RecordingProvider {
        fn at(level: LogLevel) -> Arc<Self> {
            Arc::new(Self {
                level,
                entries: Mutex::new(Vec::new()),
            })
        }

        fn count(&self) -> usize {
            self.entries.lock().len()
        }
    }

    #[async_trait]
    impl LogProvider for RecordingProvider {
        async fn write(&self, entry: &LogEntry) -> Result<()> {
            self.entries.lock().push(entry.clone());
            Ok(())
        }

        fn logging_level(&self) -> LogLevel {
            self.level
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct PanickingProvider;

    #[async_trait]
    impl LogProvider for PanickingProvider {
        async fn write(&self, _entry: &LogEntry) -> Result<()> {
            panic!("provider exploded");
        }

        fn logging_level(&self) -> LogLevel {
            LogLevel::Trace
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl LogProvider for HangingProvider {
        async fn write(&self, _entry: &LogEntry) -> Result<()> {
            futures::future::pending::<()>().await;
            Ok(())
        }

        fn logging_level(&self) -> LogLevel {
            LogLevel::Trace
        }

        fn name(&self) -> &str {
            "hanging"
        }
    }

    fn logger_with(providers: Vec<Arc<dyn LogProvider>>) -> Logger {
        Logger::builder()
            .configuration(LoggerConfiguration::new(true, LogLevel::Debug).with_application_id("unit"))
            .providers(providers)
            .build()
            .expect("valid logger")
    }

    #[test]
    fn test_build_requires_configuration() {
        let err = Logger::builder()
            .provider(RecordingProvider::at(LogLevel::Info))
            .build()
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidArgument { ref argument, .. } if argument == "configuration"));
    }

    #[test]
    fn test_build_requires_a_provider() {
        let err = Logger::builder()
            .configuration(LoggerConfiguration::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidArgument { ref argument, .. } if argument == "providers"));
    }

    #[test]
    fn test_new_realizes_lazy_provider_source_once() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulls);
        let source = (0..2).map(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            RecordingProvider::at(LogLevel::Info) as Arc<dyn LogProvider>
        });

        let logger = Logger::new(LoggerConfiguration::default(), source, None, None, None, Vec::new())
            .expect("valid logger");

        assert_eq!(pulls.load(Ordering::SeqCst), 2);
        assert_eq!(logger.providers().len(), 2);
    }

    #[test]
    fn test_application_id_resolution_order() {
        let from_provider = Logger::builder()
            .configuration(LoggerConfiguration::default().with_application_id("from-config"))
            .provider(RecordingProvider::at(LogLevel::Info))
            .application_id_provider(Arc::new(StaticApplicationId::new("from-provider")))
            .build()
            .unwrap();
        assert_eq!(from_provider.application_id(), "from-provider");

        let from_config = logger_with(vec![RecordingProvider::at(LogLevel::Info)]);
        assert_eq!(from_config.application_id(), "unit");

        let from_executable = Logger::builder()
            .configuration(LoggerConfiguration::default())
            .provider(RecordingProvider::at(LogLevel::Info))
            .build()
            .unwrap();
        assert!(!from_executable.application_id().trim().is_empty());
    }

    #[test]
    fn test_is_enabled() {
        let logger = logger_with(vec![RecordingProvider::at(LogLevel::Info)]);
        assert!(!logger.is_enabled(LogLevel::NotSet));
        assert!(!logger.is_enabled(LogLevel::Trace));
        assert!(logger.is_enabled(LogLevel::Debug));
        assert!(logger.is_enabled(LogLevel::Audit));
    }

    #[tokio::test]
    async fn test_entry_is_enriched() {
        let provider = RecordingProvider::at(LogLevel::Debug);
        let logger = logger_with(vec![provider.clone()]);

        let mut entry = LogEntry::new(LogLevel::Info, "hello");
        logger
            .log_async(&mut entry, CallerInfo::new("tests::hello", "logger.rs", 7))
            .await;

        assert_eq!(entry.application_id, "unit");
        assert!(entry.unique_id.is_some());
        assert_eq!(entry.caller_info.as_ref().map(|c| c.line_number), Some(7));
        assert_eq!(provider.entries.lock()[0], entry);
    }

    #[tokio::test]
    async fn test_gate_rejection_skips_enrichment() {
        let provider = RecordingProvider::at(LogLevel::Trace);
        let logger = logger_with(vec![provider.clone()]);

        let mut entry = LogEntry::new(LogLevel::Trace, "too quiet");
        logger.log_async(&mut entry, CallerInfo::here()).await;

        assert_eq!(provider.count(), 0);
        assert!(entry.unique_id.is_none());
        assert!(entry.caller_info.is_none());
        assert_eq!(logger.metrics().filtered_count(), 1);
    }

    #[tokio::test]
    async fn test_panicking_provider_is_contained() {
        let healthy = RecordingProvider::at(LogLevel::Debug);
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);

        let logger = Logger::builder()
            .configuration(LoggerConfiguration::default())
            .provider(Arc::new(PanickingProvider))
            .provider(healthy.clone())
            .on_write_failure(Arc::new(move |_: &LogEntry, err: &LoggerError| {
                sink.lock().push(err.to_string())
            }))
            .build()
            .unwrap();

        logger
            .log_async(&mut LogEntry::new(LogLevel::Error, "still delivered"), CallerInfo::here())
            .await;

        assert_eq!(healthy.count(), 1);
        assert_eq!(logger.metrics().writes_failed(), 1);
        assert!(failures.lock()[0].contains("provider exploded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let healthy = RecordingProvider::at(LogLevel::Debug);
        let logger = Logger::builder()
            .configuration(
                LoggerConfiguration::default().with_write_timeout(Some(Duration::from_millis(50))),
            )
            .provider(Arc::new(HangingProvider))
            .provider(healthy.clone())
            .build()
            .unwrap();

        logger
            .log_async(&mut LogEntry::new(LogLevel::Warn, "bounded"), CallerInfo::here())
            .await;

        assert_eq!(healthy.count(), 1);
        assert_eq!(logger.metrics().writes_timed_out(), 1);
        assert_eq!(logger.metrics().writes_succeeded(), 1);
    }

    #[test]
    fn test_dispatch_without_tokio_runtime() {
        let provider = RecordingProvider::at(LogLevel::Info);
        let logger = Logger::builder()
            .configuration(LoggerConfiguration::default())
            .provider(provider.clone())
            .build()
            .unwrap();
        assert!(logger.configuration().write_timeout.is_some());

        let mut entry = LogEntry::new(LogLevel::Info, "no runtime");
        futures::executor::block_on(logger.log_async(&mut entry, CallerInfo::here()));

        assert_eq!(provider.count(), 1);
        assert_eq!(logger.metrics().writes_succeeded(), 1);
    }

    #[test]
    fn test_dispatch_on_runtime_without_timers() {
        let provider = RecordingProvider::at(LogLevel::Info);
        let logger = Logger::builder()
            .configuration(LoggerConfiguration::default())
            .provider(provider.clone())
            .build()
            .unwrap();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime without time driver");
        let mut entry = LogEntry::new(LogLevel::Warn, "timers disabled");
        runtime.block_on(logger.log_async(&mut entry, CallerInfo::here()));

        assert_eq!(provider.count(), 1);
        assert_eq!(logger.metrics().writes_failed(), 0);
    }

    #[tokio::test]
    async fn test_pre_log_hook_sees_enriched_entry() {
        let observed = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&observed);

        let logger = Logger::builder()
            .configuration(LoggerConfiguration::default().with_application_id("hooked"))
            .provider(RecordingProvider::at(LogLevel::Info))
            .context_provider(Arc::new(|entry: &mut LogEntry| {
                entry.extended_properties.add_field("enriched", true);
            }))
            .pre_log_hook(Arc::new(move |entry: &LogEntry| {
                *slot.lock() = Some(entry.clone());
            }))
            .build()
            .unwrap();

        logger
            .log_async(&mut LogEntry::new(LogLevel::Info, "observe me"), CallerInfo::here())
            .await;

        let seen = observed.lock().clone().expect("hook ran");
        assert_eq!(seen.application_id, "hooked");
        assert!(seen.extended_properties.contains_key("enriched"));
    }

    #[tokio::test]
    async fn test_owned_log_returns_enriched_entry() {
        let logger = logger_with(vec![RecordingProvider::at(LogLevel::Info)]);
        let entry = logger
            .log(LogEntry::new(LogLevel::Info, "owned"), CallerInfo::here())
            .await;
        assert!(entry.unique_id.is_some());
    }
}

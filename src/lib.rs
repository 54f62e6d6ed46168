//! # Log Dispatch
//!
//! A pluggable asynchronous log dispatcher. Given a structured [`LogEntry`],
//! the [`Logger`] decides whether it should be recorded, enriches it with
//! application, caller and contextual metadata, and writes it concurrently to
//! every interested [`LogProvider`]. Audit entries take a separate,
//! privileged route.
//!
//! ## Features
//!
//! - **Gatekeeping**: global switch, minimum level and pluggable throttling
//! - **Enrichment**: application id, unique id, call site, context providers
//! - **Audit Routing**: audit entries bypass the gate and can go to a dedicated provider
//! - **Concurrent Fan-out**: all provider writes run together, each bounded by a deadline
//! - **Failure Containment**: provider errors, panics and timeouts never reach the caller

pub mod core;
pub mod macros;
pub mod providers;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::providers::ConsoleProvider;
    #[cfg(feature = "file")]
    pub use crate::providers::FileProvider;
    pub use crate::providers::NullLogProvider;
    pub use crate::core::{
        ApplicationIdProvider, CallerInfo, ContextGuard, ContextProvider, FailurePolicy,
        FieldValue, LogContext, LogEntry, LogLevel, LogProvider, LogSampler, Logger,
        LoggerBuilder, LoggerConfiguration, LoggerContext, LoggerError, LoggerMetrics,
        NullThrottlingRuleEvaluator, OutputFormat, Result, SamplingConfig, StaticApplicationId,
        ThrottlingRuleEvaluator, TimestampFormat,
    };
}

pub use crate::core::{
    ApplicationIdProvider, CallerInfo, ContextGuard, ContextProvider, FailurePolicy, FieldValue,
    LogContext, LogEntry, LogLevel, LogProvider, LogSampler, Logger, LoggerBuilder,
    LoggerConfiguration, LoggerContext, LoggerError, LoggerMetrics, NullThrottlingRuleEvaluator,
    OutputFormat, PreLogHook, Result, SamplerMetrics, SamplingConfig, StaticApplicationId,
    ThrottlingRuleEvaluator, TimestampFormat, WriteFailureCallback,
};

//! Core dispatcher types and collaborator traits

pub mod application_id;
pub mod caller_info;
pub mod config;
pub mod context_provider;
pub mod error;
pub mod failure_policy;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod provider;
pub mod sampling;
pub mod throttling;
pub mod timestamp;

pub use application_id::{
    application_id_from_executable, ApplicationIdProvider, StaticApplicationId,
    UNKNOWN_APPLICATION_ID,
};
pub use caller_info::CallerInfo;
pub use config::{LoggerConfiguration, DEFAULT_WRITE_TIMEOUT};
pub use context_provider::ContextProvider;
pub use error::{LoggerError, Result};
pub use failure_policy::{FailurePolicy, PreLogHook, WriteFailureCallback};
pub use log_context::{ContextGuard, FieldValue, LogContext, LoggerContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use provider::LogProvider;
pub use sampling::{LogSampler, SamplerMetrics, SamplingConfig};
pub use throttling::{NullThrottlingRuleEvaluator, ThrottlingRuleEvaluator};
pub use timestamp::TimestampFormat;

//! Throttling rules consulted before an entry is dispatched

use super::log_entry::LogEntry;

/// Decides whether an entry that already passed the level gate is logged
///
/// Evaluators are never consulted for `Audit` entries.
pub trait ThrottlingRuleEvaluator: Send + Sync {
    fn should_log(&self, entry: &LogEntry) -> bool;
}

/// Always allows logging
#[derive(Debug, Clone, Copy, Default)]
pub struct NullThrottlingRuleEvaluator;

impl ThrottlingRuleEvaluator for NullThrottlingRuleEvaluator {
    #[inline]
    fn should_log(&self, _entry: &LogEntry) -> bool {
        true
    }
}

impl<F> ThrottlingRuleEvaluator for F
where
    F: Fn(&LogEntry) -> bool + Send + Sync,
{
    fn should_log(&self, entry: &LogEntry) -> bool {
        self(entry)
    }
}

//! Context providers enrich entries before they reach any log provider

use super::log_context::LoggerContext;
use super::log_entry::LogEntry;

/// Adds ambient data to an entry, synchronously and in place
///
/// Providers run in registration order, so a provider may rely on fields
/// added by the ones registered before it.
pub trait ContextProvider: Send + Sync {
    fn add_context_data(&self, entry: &mut LogEntry);
}

impl<F> ContextProvider for F
where
    F: Fn(&mut LogEntry) + Send + Sync,
{
    fn add_context_data(&self, entry: &mut LogEntry) {
        self(entry)
    }
}

impl ContextProvider for LoggerContext {
    fn add_context_data(&self, entry: &mut LogEntry) {
        self.merge_into(&mut entry.extended_properties);
    }
}

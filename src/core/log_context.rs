//! Structured key-value data carried by log entries
//!
//! This module provides:
//! - `LogContext`: the per-entry bag of extended properties
//! - `LoggerContext`: shared fields merged into every dispatched entry
//! - `ContextGuard`: RAII guard for scoped shared fields

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Borrow the string payload, if this is a string field
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Extended properties of a single log entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogContext {
    fields: HashMap<String, FieldValue>,
}

impl LogContext {
    /// Create a new empty log context
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Add a field only when the key is not present yet
    ///
    /// Returns `true` if the field was inserted.
    pub fn add_field_if_absent<K, V>(&mut self, key: K, value: V) -> bool
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        match self.fields.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    /// Get all fields
    pub fn fields(&self) -> &HashMap<String, FieldValue> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `key=value` pairs sorted by key, space separated
    pub fn format_fields(&self) -> String {
        let mut pairs: Vec<_> = self.fields.iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

/// Fields shared by every entry a logger dispatches
///
/// Register a `LoggerContext` as a context provider and each dispatched entry
/// receives its fields (service name, deployment, request scope). Keys the
/// entry already carries are left untouched. Clones share one field set, so
/// a request handler can hold a clone and scope fields while the logger reads
/// them.
///
/// # Example
///
/// ```
/// use log_dispatch::core::{LogContext, LoggerContext};
///
/// let shared = LoggerContext::new();
/// shared.set("service", "api-gateway");
///
/// let mut properties = LogContext::new().with_field("service", "override");
/// shared.merge_into(&mut properties);
/// assert_eq!(properties.get("service").and_then(|v| v.as_str()), Some("override"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerContext {
    fields: Arc<RwLock<HashMap<String, FieldValue>>>,
}

impl LoggerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a shared field
    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<FieldValue> {
        self.fields.write().remove(key)
    }

    pub fn clear(&self) {
        self.fields.write().clear();
    }

    /// Current value of a shared field
    pub fn get(&self, key: &str) -> Option<FieldValue> {
        self.fields.read().get(key).cloned()
    }

    /// Copy of the shared field set at this instant
    pub fn get_fields(&self) -> HashMap<String, FieldValue> {
        self.fields.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    /// Copy shared fields into an entry's properties; entry keys win
    ///
    /// Returns how many fields were added.
    pub fn merge_into(&self, properties: &mut LogContext) -> usize {
        self.fields
            .read()
            .iter()
            .filter(|(key, value)| properties.add_field_if_absent(key.as_str(), (*value).clone()))
            .count()
    }

    /// Set a field until the returned guard is dropped
    ///
    /// A value the field held before is restored when the guard drops, so
    /// nested scopes for the same key unwind correctly.
    pub fn scoped<K, V>(&self, key: K, value: V) -> ContextGuard
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let key = key.into();
        let previous = self.fields.write().insert(key.clone(), value.into());
        ContextGuard {
            context: self.clone(),
            key,
            previous,
        }
    }
}

/// Removes (or restores) a scoped shared field on drop
///
/// # Example
///
/// ```
/// use log_dispatch::core::LoggerContext;
///
/// let shared = LoggerContext::new();
/// {
///     let _request = shared.scoped("request_id", "abc-123");
///     assert_eq!(shared.len(), 1);
/// }
/// assert!(shared.is_empty());
/// ```
#[must_use = "the field is removed as soon as the guard is dropped"]
pub struct ContextGuard {
    context: LoggerContext,
    key: String,
    previous: Option<FieldValue>,
}

impl ContextGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let mut fields = self.context.fields.write();
        match self.previous.take() {
            Some(previous) => {
                fields.insert(std::mem::take(&mut self.key), previous);
            }
            None => {
                fields.remove(&self.key);
            }
        }
    }
}

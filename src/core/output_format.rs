//! Output formats used by the bundled providers
//!
//! - Text: human-readable line (default)
//! - Json: one JSON object per entry
//! - Logfmt: key=value pairs
//! - Template: user pattern with `{placeholder}` substitution

use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Output format for log entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z] [INFO ] billing 7f3e... - Request processed key=value`
    #[default]
    Text,

    /// `{"timestamp":"...","level":"INFO","message":"Request processed",...}`
    Json,

    /// `timestamp=... level=INFO message="Request processed"`
    Logfmt,

    /// Pattern with placeholders: `{timestamp}`, `{level}`, `{message}`,
    /// `{application_id}`, `{unique_id}`, `{caller}`, `{thread}`,
    /// `{exception}` and `{fields}`
    Template(String),
}

impl OutputFormat {
    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format_text(entry, timestamp_format),
            OutputFormat::Json => format_json(entry, timestamp_format),
            OutputFormat::Logfmt => format_logfmt(entry, timestamp_format),
            OutputFormat::Template(template) => format_template(template, entry, timestamp_format),
        }
    }
}

fn thread_label(entry: &LogEntry) -> &str {
    entry.thread_name.as_deref().unwrap_or(&entry.thread_id)
}

fn format_text(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut line = format!(
        "[{}] [{:5}] {} {} - {}",
        timestamp_format.format(&entry.timestamp),
        entry.level.to_str(),
        entry.application_id,
        entry.unique_id.as_deref().unwrap_or("-"),
        entry.message
    );

    if let Some(ref caller) = entry.caller_info {
        line.push_str(&format!(" @ {}", caller));
    }
    if let Some(ref exception) = entry.exception {
        line.push_str(&format!(" | {}", exception));
    }
    if !entry.extended_properties.is_empty() {
        line.push(' ');
        line.push_str(&entry.extended_properties.format_fields());
    }

    line
}

fn format_json(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    use serde_json::{Map, Value};

    let mut obj = Map::new();

    let timestamp = if timestamp_format.is_numeric() {
        match timestamp_format {
            TimestampFormat::Unix => Value::Number(entry.timestamp.timestamp().into()),
            _ => Value::Number(entry.timestamp.timestamp_millis().into()),
        }
    } else {
        Value::String(timestamp_format.format(&entry.timestamp))
    };
    obj.insert("timestamp".to_string(), timestamp);
    obj.insert("level".to_string(), Value::String(entry.level.to_str().to_string()));
    obj.insert("message".to_string(), Value::String(entry.message.clone()));
    obj.insert(
        "application_id".to_string(),
        Value::String(entry.application_id.clone()),
    );
    if let Some(ref unique_id) = entry.unique_id {
        obj.insert("unique_id".to_string(), Value::String(unique_id.clone()));
    }
    obj.insert("thread".to_string(), Value::String(thread_label(entry).to_string()));

    if let Some(ref caller) = entry.caller_info {
        if let Some(ref member) = caller.member_name {
            obj.insert("caller_member".to_string(), Value::String(member.clone()));
        }
        if let Some(ref file) = caller.file_path {
            obj.insert("caller_file".to_string(), Value::String(file.clone()));
        }
        obj.insert("caller_line".to_string(), Value::Number(caller.line_number.into()));
    }
    if let Some(ref exception) = entry.exception {
        obj.insert("exception".to_string(), Value::String(exception.clone()));
    }

    // Reserved keys win over extended properties with the same name.
    for (key, value) in entry.extended_properties.fields() {
        obj.entry(key.clone()).or_insert_with(|| value.to_json_value());
    }

    Value::Object(obj).to_string()
}

fn format_logfmt(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut parts = vec![
        format!(
            "timestamp={}",
            escape_logfmt_value(&timestamp_format.format(&entry.timestamp))
        ),
        format!("level={}", entry.level.to_str()),
        format!("message={}", quote_logfmt_value(&entry.message)),
        format!("application_id={}", escape_logfmt_value(&entry.application_id)),
    ];

    if let Some(ref unique_id) = entry.unique_id {
        parts.push(format!("unique_id={}", escape_logfmt_value(unique_id)));
    }
    parts.push(format!("thread={}", escape_logfmt_value(thread_label(entry))));
    if let Some(ref caller) = entry.caller_info {
        parts.push(format!("caller={}", escape_logfmt_value(&caller.to_string())));
    }
    if let Some(ref exception) = entry.exception {
        parts.push(format!("exception={}", quote_logfmt_value(exception)));
    }

    let mut fields: Vec<_> = entry.extended_properties.fields().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in fields {
        let formatted = match value {
            FieldValue::String(s) => quote_logfmt_value(s),
            other => other.to_string(),
        };
        parts.push(format!("{}={}", escape_logfmt_key(key), formatted));
    }

    parts.join(" ")
}

fn format_template(template: &str, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let caller = entry
        .caller_info
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    template
        .replace("{timestamp}", &timestamp_format.format(&entry.timestamp))
        .replace("{level}", entry.level.to_str())
        .replace("{application_id}", &entry.application_id)
        .replace("{unique_id}", entry.unique_id.as_deref().unwrap_or(""))
        .replace("{caller}", &caller)
        .replace("{thread}", thread_label(entry))
        .replace("{exception}", entry.exception.as_deref().unwrap_or(""))
        .replace("{fields}", &entry.extended_properties.format_fields())
        // Message last so placeholders inside user text are left alone.
        .replace("{message}", &entry.message)
}

fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=']) {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

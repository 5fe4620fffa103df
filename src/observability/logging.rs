//! Structured logging for the Vertex AI client.

use serde_json::Value;
use crate::config::LogLevel;

/// Logger trait for structured logging.
pub trait Logger: Send + Sync {
    /// Log a debug message with structured context.
    fn debug(&self, message: &str, fields: Value);

    /// Log an info message with structured context.
    fn info(&self, message: &str, fields: Value);

    /// Log a warning message with structured context.
    fn warn(&self, message: &str, fields: Value);

    /// Log an error message with structured context.
    fn error(&self, message: &str, fields: Value);
}

const SENSITIVE_KEYS: &[&str] = &[
    "token",
    "access_token",
    "accessToken",
    "authorization",
    "Authorization",
    "bearer",
    "secret",
    "credential",
];

const REDACTED: &str = "***REDACTED***";

fn severity(level: LogLevel) -> u8 {
    match level {
        LogLevel::Error => 0,
        LogLevel::Warn => 1,
        LogLevel::Info => 2,
        LogLevel::Debug => 3,
        LogLevel::Trace => 4,
    }
}

/// Replaces credential-bearing fields at any depth.
fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SENSITIVE_KEYS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Logger that emits `tracing` events with JSON context fields.
///
/// Credential fields (`access_token`, `authorization` and similar) are
/// replaced before the event is recorded.
pub struct StructuredLogger {
    name: String,
    level: LogLevel,
}

impl StructuredLogger {
    /// Create a new structured logger with the given name.
    ///
    /// ```
    /// use integrations_vertexai::observability::{Logger, StructuredLogger};
    /// use integrations_vertexai::config::LogLevel;
    /// use serde_json::json;
    ///
    /// let logger = StructuredLogger::new("vertexai.content").with_level(LogLevel::Debug);
    /// logger.debug("chunk received", json!({ "candidates": 1 }));
    /// ```
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: LogLevel::Info,
        }
    }

    /// Set the minimum log level for this logger.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    fn should_log(&self, level: LogLevel) -> bool {
        severity(level) <= severity(self.level)
    }

    fn prepare(&self, level: LogLevel, mut fields: Value) -> Option<Value> {
        if !self.should_log(level) {
            return None;
        }
        redact(&mut fields);
        Some(fields)
    }
}

impl Logger for StructuredLogger {
    fn debug(&self, message: &str, fields: Value) {
        if let Some(fields) = self.prepare(LogLevel::Debug, fields) {
            tracing::debug!(logger = %self.name, fields = %fields, "{}", message);
        }
    }

    fn info(&self, message: &str, fields: Value) {
        if let Some(fields) = self.prepare(LogLevel::Info, fields) {
            tracing::info!(logger = %self.name, fields = %fields, "{}", message);
        }
    }

    fn warn(&self, message: &str, fields: Value) {
        if let Some(fields) = self.prepare(LogLevel::Warn, fields) {
            tracing::warn!(logger = %self.name, fields = %fields, "{}", message);
        }
    }

    fn error(&self, message: &str, fields: Value) {
        if let Some(fields) = self.prepare(LogLevel::Error, fields) {
            tracing::error!(logger = %self.name, fields = %fields, "{}", message);
        }
    }
}

/// Logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _fields: Value) {}
    fn info(&self, _message: &str, _fields: Value) {}
    fn warn(&self, _message: &str, _fields: Value) {}
    fn error(&self, _message: &str, _fields: Value) {}
}

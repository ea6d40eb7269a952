//! Structured logging with request context.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use vitrine_core::RequestId;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON lines for log aggregation.
    #[default]
    Json,
    /// Key-value lines for development.
    Human,
}

/// One structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    pub elapsed_us: u64,
}

impl LogEntry {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    fn to_human(&self) -> String {
        let mut line = format!(
            "[{}] {} request={} ({}us)",
            self.level, self.message, self.request_id, self.elapsed_us
        );
        for (key, value) in &self.fields {
            line.push_str(&format!(" {key}={value}"));
        }
        line
    }
}

/// Structured logger scoped to one request.
///
/// Formats entries and hands them to `tracing` at the matching level;
/// the host's subscriber decides where they land.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    request_id: RequestId,
    route: Option<String>,
    start: std::time::Instant,
    min_level: LogLevel,
    format: LogFormat,
}

impl RequestLogger {
    /// Create a logger for a request.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            route: None,
            start: std::time::Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
        }
    }

    /// Attach the route path.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Set the minimum level emitted.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message, BTreeMap::new());
    }

    /// Start a log entry with extra fields.
    pub fn entry(&self, level: LogLevel, message: impl Into<String>) -> EntryBuilder<'_> {
        EntryBuilder {
            logger: self,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// The request ID this logger is scoped to.
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    fn emit(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            request_id: self.request_id.to_string(),
            route: self.route.clone(),
            fields,
            elapsed_us: self.start.elapsed().as_micros() as u64,
        };
        let line = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };

        match level {
            LogLevel::Debug => tracing::debug!(target: "vitrine", "{line}"),
            LogLevel::Info => tracing::info!(target: "vitrine", "{line}"),
            LogLevel::Warn => tracing::warn!(target: "vitrine", "{line}"),
            LogLevel::Error => tracing::error!(target: "vitrine", "{line}"),
        }
    }
}

/// Fluent builder for entries with fields.
pub struct EntryBuilder<'a> {
    logger: &'a RequestLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl EntryBuilder<'_> {
    /// Add a field.
    pub fn field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Emit the entry.
    pub fn emit(self) {
        self.logger.emit(self.level, &self.message, self.fields);
    }
}

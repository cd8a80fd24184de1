use std::env;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::telemetry::adapter::{ChannelSink, RecordAdapter, RecordSink};
use crate::telemetry::config::ExecutionContext;
use crate::telemetry::emitter::{self, TelemetryEmitter};
use crate::telemetry::record::{Attributes, LogRecord};
use crate::telemetry::severity::Severity;

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Buffered server-side logger.
///
/// Serializes each record as one newline-delimited JSON line into its
/// [`RecordSink`], from which the record adapter forwards it to the
/// emitter. Static base fields (deployment environment, build revision) are
/// attached by the logger, not per call.
pub struct ServerLogger {
    min_level: Severity,
    base: Attributes,
    sink: Arc<dyn RecordSink>,
}

impl ServerLogger {
    pub fn new(sink: Arc<dyn RecordSink>) -> Self {
        Self {
            min_level: Severity::Trace,
            base: Attributes::new(),
            sink,
        }
    }

    /// Logger configured from `LOG_LEVEL`, `APP_ENV` and `GIT_COMMIT_SHA`.
    ///
    /// The default minimum level is the most verbose.
    pub fn from_env(sink: Arc<dyn RecordSink>) -> Self {
        let mut logger = Self::new(sink);
        if let Some(level) = env::var("LOG_LEVEL").ok().and_then(|v| Severity::parse(&v)) {
            logger.min_level = level;
        }
        if let Some(environment) = env::var("APP_ENV").ok().filter(|v| !v.is_empty()) {
            logger = logger.with_base_field("env", environment);
        }
        if let Some(revision) = env::var("GIT_COMMIT_SHA").ok().filter(|v| !v.is_empty()) {
            logger = logger.with_base_field("revision", revision);
        }
        logger
    }

    pub fn with_min_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_base_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base.insert(key.into(), value.into());
        self
    }

    pub fn log(&self, severity: Severity, body: Value, attributes: Attributes) {
        if severity < self.min_level {
            return;
        }

        let mut fields = Attributes::new();
        fields.insert("level".to_string(), severity.level().into());
        fields.insert("time".to_string(), epoch_millis().into());
        for (key, value) in self.base.clone() {
            fields.insert(key, value);
        }
        for (key, value) in attributes {
            fields.insert(key, value);
        }
        // The body goes in last under the primary message field, so it can
        // never appear twice.
        fields.insert("msg".to_string(), body);

        if let Ok(line) = serde_json::to_string(&fields) {
            self.sink.write(line);
        }
    }
}

enum Variant {
    /// Browser path: every call emits immediately.
    Direct(Arc<TelemetryEmitter>),
    /// Server path: records buffer through the adapter stream.
    Buffered(ServerLogger),
}

/// The logging interface consumed by application code.
///
/// Two interchangeable variants behind one four-method surface; the variant
/// is selected once at construction, never per call.
pub struct Logger {
    variant: Variant,
}

impl Logger {
    /// Direct-emit variant (browser context).
    pub fn direct(emitter: Arc<TelemetryEmitter>) -> Self {
        Self {
            variant: Variant::Direct(emitter),
        }
    }

    /// Buffered variant (server context).
    pub fn buffered(server: ServerLogger) -> Self {
        Self {
            variant: Variant::Buffered(server),
        }
    }

    /// Select the variant for an execution context.
    ///
    /// Server context wires the buffered logger through a spawned record
    /// stream, so this must be called from within the async runtime.
    pub fn new(context: ExecutionContext, emitter: Arc<TelemetryEmitter>) -> Self {
        match context {
            ExecutionContext::Browser => Self::direct(emitter),
            ExecutionContext::Server => {
                let adapter = Arc::new(RecordAdapter::new(emitter));
                let stream = ChannelSink::spawn(adapter);
                Self::buffered(ServerLogger::from_env(stream))
            }
        }
    }

    /// Context-detected logger over the process-wide emitter.
    pub fn from_env() -> Self {
        Self::new(ExecutionContext::detect(), emitter::global())
    }

    pub fn debug(&self, body: impl Into<Value>, attributes: Attributes) {
        self.log(Severity::Debug, body.into(), attributes);
    }

    pub fn info(&self, body: impl Into<Value>, attributes: Attributes) {
        self.log(Severity::Info, body.into(), attributes);
    }

    pub fn warn(&self, body: impl Into<Value>, attributes: Attributes) {
        self.log(Severity::Warn, body.into(), attributes);
    }

    pub fn error(&self, body: impl Into<Value>, attributes: Attributes) {
        self.log(Severity::Error, body.into(), attributes);
    }

    fn log(&self, severity: Severity, body: Value, attributes: Attributes) {
        match &self.variant {
            Variant::Direct(emitter) => emitter.emit(LogRecord {
                severity,
                body,
                attributes,
            }),
            Variant::Buffered(server) => server.log(severity, body, attributes),
        }
    }
}

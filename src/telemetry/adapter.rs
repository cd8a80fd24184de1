use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::error;

use crate::telemetry::emitter::TelemetryEmitter;
use crate::telemetry::error::TelemetryError;
use crate::telemetry::record::LogRecord;
use crate::telemetry::severity::Severity;

/// Destination for the buffered logger's serialized records.
///
/// Implementations must never block the writer.
pub trait RecordSink: Send + Sync {
    fn write(&self, line: String);
}

/// Decodes buffered records from the server logger's stream and forwards
/// them through the emitter.
///
/// Processing is infallible: a record that cannot be decoded is counted,
/// reported to the diagnostic sink, and dropped. It never propagates an
/// error and never stalls the stream.
pub struct RecordAdapter {
    emitter: Arc<TelemetryEmitter>,
    dropped: AtomicU64,
}

impl RecordAdapter {
    pub fn new(emitter: Arc<TelemetryEmitter>) -> Self {
        Self {
            emitter,
            dropped: AtomicU64::new(0),
        }
    }

    /// Consume one newline-delimited record.
    pub fn process_line(&self, line: &str) {
        match serde_json::from_str::<Value>(line) {
            Ok(value) => self.process_value(value),
            Err(err) => self.drop_malformed(TelemetryError::from(err)),
        }
    }

    /// Consume an already-structured record.
    pub fn process_value(&self, value: Value) {
        let Value::Object(mut fields) = value else {
            self.drop_malformed("record is not an object");
            return;
        };

        let level = fields
            .get("level")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        let severity = Severity::from_level(level);
        fields.remove("level");

        // `msg` is the primary message field, `message` the fallback; both
        // are stripped so the message never rides along as an attribute.
        let primary = fields.remove("msg");
        let secondary = fields.remove("message");
        let body = primary
            .or(secondary)
            .unwrap_or_else(|| Value::String(String::new()));

        self.emitter.emit(LogRecord {
            severity,
            body,
            attributes: fields,
        });
    }

    /// Number of records dropped as malformed.
    pub fn dropped_records(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn drop_malformed(&self, reason: impl std::fmt::Display) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        error!(%reason, "failed to process buffered log record");
    }
}

/// Record stream backed by an unbounded channel with a drain task.
///
/// The writer side never blocks; the drain task acknowledges each line by
/// advancing the receive loop, whether or not the line decoded.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Spawn the drain task consuming the stream into the adapter.
    pub fn spawn(adapter: Arc<RecordAdapter>) -> Arc<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                adapter.process_line(&line);
            }
        });
        Arc::new(Self { tx })
    }
}

impl RecordSink for ChannelSink {
    fn write(&self, line: String) {
        // A failed send means the drain task is gone.
        let _ = self.tx.send(line);
    }
}

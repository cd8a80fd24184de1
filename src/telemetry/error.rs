use thiserror::Error;

/// Failures internal to the logging bridge.
///
/// None of these ever propagate to application code: pipeline construction
/// failures degrade to the fallback sink, malformed records are counted and
/// dropped. An absent configuration is not an error at all; it is a
/// recognized degraded mode carried as `ResolvedConfig { endpoint: None }`.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The OTLP exporter or provider could not be constructed.
    #[error("exporter error: {0}")]
    Exporter(String),
    /// A buffered record could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

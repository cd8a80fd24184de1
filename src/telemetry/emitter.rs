use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use opentelemetry::logs::{LogRecord as _, Logger as _, LoggerProvider as _};
use opentelemetry_otlp::{Protocol, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::logs::{SdkLogger, SdkLoggerProvider};
use serde_json::Value;
use tracing::{error, warn};

use crate::telemetry::config::{ExecutionContext, ResolvedConfig, ServiceIdentity};
use crate::telemetry::error::TelemetryError;
use crate::telemetry::record::{to_any_value, LogRecord};
use crate::telemetry::resource::build_resource;

/// Marker prefixed to every record written to the local fallback sink, so
/// its origin is distinguishable from a directly-configured console log.
pub const FALLBACK_TAG: &str = "[signoz fallback]";

/// Local destination for records when no export target is configured or the
/// pipeline could not be built. Every record reaches either the backend or a
/// sink implementing this trait, never neither.
pub trait FallbackSink: Send + Sync {
    fn write(&self, record: &LogRecord);
}

/// Default fallback sink: one tagged line per record on the process console.
pub struct ConsoleSink;

fn fallback_line(record: &LogRecord) -> String {
    let body = match &record.body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let attributes = Value::Object(record.attributes.clone());
    format!(
        "{FALLBACK_TAG}[{}] {body} {attributes}",
        record.severity.text()
    )
}

impl FallbackSink for ConsoleSink {
    fn write(&self, record: &LogRecord) {
        println!("{}", fallback_line(record));
    }
}

/// Terminal state of the pipeline, reached exactly once.
enum PipelineState {
    /// Export pipeline registered; records flow through the batch exporter.
    Active {
        provider: SdkLoggerProvider,
        logger: SdkLogger,
    },
    /// No export target; records go to the fallback sink.
    Fallback,
}

/// Owns the process-wide telemetry pipeline.
///
/// Constructed once and shared by reference; tests can instantiate
/// independent emitters with explicit configuration. Initialization is lazy
/// (the first [`emit`] triggers it) and one-shot: concurrent first callers
/// block briefly on the gate and all observe the same terminal state.
///
/// [`emit`]: TelemetryEmitter::emit
pub struct TelemetryEmitter {
    context: ExecutionContext,
    config: Option<ResolvedConfig>,
    identity: Option<ServiceIdentity>,
    fallback: Box<dyn FallbackSink>,
    state: OnceLock<PipelineState>,
}

impl TelemetryEmitter {
    /// Emitter resolving its configuration from the context's environment
    /// namespace at first use.
    pub fn new(context: ExecutionContext) -> Self {
        Self {
            context,
            config: None,
            identity: None,
            fallback: Box::new(ConsoleSink),
            state: OnceLock::new(),
        }
    }

    /// Use an explicit configuration instead of resolving the environment.
    pub fn with_config(mut self, config: ResolvedConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an explicit service identity instead of resolving the environment.
    pub fn with_identity(mut self, identity: ServiceIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_fallback_sink(mut self, sink: Box<dyn FallbackSink>) -> Self {
        self.fallback = sink;
        self
    }

    /// Configure the pipeline. Idempotent: the first call (from anywhere)
    /// decides the terminal state, later calls are no-ops.
    pub fn init(&self) {
        self.state();
    }

    /// Emit one record. Initializes lazily on first use.
    ///
    /// Never fails and never reaches the caller with an error: the record is
    /// handed to the batch exporter or written to the fallback sink.
    pub fn emit(&self, record: LogRecord) {
        match self.state() {
            PipelineState::Active { logger, .. } => {
                let mut otel = logger.create_log_record();
                otel.set_severity_number(record.severity.otel());
                otel.set_severity_text(record.severity.text());
                otel.set_body(to_any_value(record.body));
                for (key, value) in record.attributes {
                    otel.add_attribute(key, to_any_value(value));
                }
                logger.emit(otel);
            }
            PipelineState::Fallback => self.fallback.write(&record),
        }
    }

    /// Flush and shut down the export pipeline. No-op when inactive.
    pub fn shutdown(&self) {
        if let Some(PipelineState::Active { provider, .. }) = self.state.get() {
            if let Err(err) = provider.shutdown() {
                error!(error = %err, "failed to shut down log export pipeline");
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state.get(), Some(PipelineState::Active { .. }))
    }

    fn state(&self) -> &PipelineState {
        self.state.get_or_init(|| self.build_state())
    }

    fn build_state(&self) -> PipelineState {
        let resolved = match &self.config {
            Some(config) => config.clone(),
            None => ResolvedConfig::resolve(self.context),
        };

        let Some(endpoint) = resolved.endpoint else {
            warn!(
                "SigNoz logging not configured. Set SIGNOZ_ENDPOINT or SIGNOZ_REGION \
                 (and optional SIGNOZ_INGESTION_KEY); records go to the local console."
            );
            return PipelineState::Fallback;
        };

        let identity = self
            .identity
            .clone()
            .unwrap_or_else(ServiceIdentity::from_env);

        match build_pipeline(&endpoint, resolved.headers, &identity) {
            Ok(provider) => {
                let logger = provider.logger(env!("CARGO_PKG_NAME"));
                PipelineState::Active { provider, logger }
            }
            Err(err) => {
                error!(error = %err, %endpoint, "failed to build log export pipeline; records go to the local console");
                PipelineState::Fallback
            }
        }
    }
}

/// Build the batching OTLP/HTTP pipeline for a resolved endpoint.
fn build_pipeline(
    endpoint: &str,
    headers: Option<HashMap<String, String>>,
    identity: &ServiceIdentity,
) -> Result<SdkLoggerProvider, TelemetryError> {
    let mut builder = opentelemetry_otlp::LogExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .with_protocol(Protocol::HttpBinary);

    if let Some(headers) = headers {
        builder = builder.with_headers(headers);
    }

    let exporter = builder
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    Ok(SdkLoggerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(build_resource(identity))
        .build())
}

static GLOBAL: OnceLock<Arc<TelemetryEmitter>> = OnceLock::new();

/// The process-wide emitter shared by the facade loggers.
pub fn global() -> Arc<TelemetryEmitter> {
    GLOBAL
        .get_or_init(|| Arc::new(TelemetryEmitter::new(ExecutionContext::detect())))
        .clone()
}

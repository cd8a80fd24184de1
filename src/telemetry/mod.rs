//! Logging bridge: one telemetry stream for server and browser log calls.
//!
//! Application code logs through the [`Logger`] facade. On the server the
//! records buffer through a structured logger and the record adapter; in the
//! browser each call emits directly. Both paths converge on the
//! [`TelemetryEmitter`], which ships records to a SigNoz ingestion endpoint
//! over OTLP/HTTP, or, when no endpoint is configured, to a tagged local
//! console sink so no log call is ever silently dropped.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use telemetry::{attrs, Logger};
//!
//! let logger = Logger::from_env();
//! logger.info("Handled response", attrs(serde_json::json!({"source": "api/hello"})));
//! ```
//!
//! # Environment Variables
//!
//! Server context reads the plain keys, browser context the `PUBLIC_`-prefixed
//! variants (publicly embeddable, no secrets). One context never reads the
//! other's keys.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SIGNOZ_ENDPOINT` | Full OTLP logs endpoint URL | - |
//! | `SIGNOZ_REGION` | Region code for the derived ingestion endpoint | - |
//! | `SIGNOZ_INGESTION_KEY` | Sent as the `signoz-ingestion-key` header | - |
//! | `SIGNOZ_SERVICE_NAME` | Service name resource attribute | `CARGO_PKG_NAME` |
//! | `SIGNOZ_SERVICE_NAMESPACE` | Service namespace resource attribute | - |
//! | `GIT_COMMIT_SHA` | Build revision (`service.version`) | `dev` |
//! | `APP_ENV` | Deployment environment name | `development` |
//! | `LOG_LEVEL` | Server logger minimum level | `trace` |
//!
//! With neither endpoint nor region set, the pipeline stays inert and every
//! record goes to the console, prefixed with `[signoz fallback]`.
//!
//! # Module Structure
//!
//! - [`severity`]: canonical severity mapping
//! - [`config`]: execution context and configuration resolution
//! - [`resource`]: process identity attached to every exported record
//! - [`record`]: the normalized log record
//! - [`emitter`]: the process-wide export pipeline with local fallback
//! - [`adapter`]: decodes the server logger's buffered record stream
//! - [`logger`]: the four-method facade consumed by application code
//! - [`error`]: error taxonomy

#![allow(dead_code, unused_imports)] // Public API - not all items used internally

pub mod adapter;
pub mod config;
pub mod emitter;
pub mod error;
pub mod logger;
pub mod record;
pub mod resource;
pub mod severity;

// Re-exports
pub use adapter::{ChannelSink, RecordAdapter, RecordSink};
pub use config::{ExecutionContext, ResolvedConfig, ServiceIdentity, INGESTION_KEY_HEADER};
pub use emitter::{global, ConsoleSink, FallbackSink, TelemetryEmitter, FALLBACK_TAG};
pub use error::TelemetryError;
pub use logger::{Logger, ServerLogger};
pub use record::{attrs, Attributes, LogRecord};
pub use severity::Severity;

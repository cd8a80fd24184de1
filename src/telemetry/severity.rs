use opentelemetry::logs::Severity as OtelSeverity;

/// Canonical severity of a log record.
///
/// Carries the (severity number, severity text) pair of the OpenTelemetry
/// log data model as a single value, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Map a numeric level from the buffered logger's ascending scale.
    ///
    /// Unrecognized levels map to `Info` rather than failing.
    pub fn from_level(level: i64) -> Self {
        match level {
            10 => Self::Trace,
            20 => Self::Debug,
            30 => Self::Info,
            40 => Self::Warn,
            50 => Self::Error,
            60 => Self::Fatal,
            _ => Self::Info,
        }
    }

    /// Parse a level name as found in `LOG_LEVEL`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            "fatal" => Some(Self::Fatal),
            _ => None,
        }
    }

    /// OpenTelemetry severity number.
    pub fn number(self) -> u8 {
        match self {
            Self::Trace => 1,
            Self::Debug => 5,
            Self::Info => 9,
            Self::Warn => 13,
            Self::Error => 17,
            Self::Fatal => 21,
        }
    }

    /// Canonical severity text.
    pub fn text(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Numeric level on the buffered logger's scale (inverse of [`from_level`]).
    ///
    /// [`from_level`]: Severity::from_level
    pub fn level(self) -> i64 {
        match self {
            Self::Trace => 10,
            Self::Debug => 20,
            Self::Info => 30,
            Self::Warn => 40,
            Self::Error => 50,
            Self::Fatal => 60,
        }
    }

    pub(crate) fn otel(self) -> OtelSeverity {
        match self {
            Self::Trace => OtelSeverity::Trace,
            Self::Debug => OtelSeverity::Debug,
            Self::Info => OtelSeverity::Info,
            Self::Warn => OtelSeverity::Warn,
            Self::Error => OtelSeverity::Error,
            Self::Fatal => OtelSeverity::Fatal,
        }
    }
}

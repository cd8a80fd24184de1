use opentelemetry::logs::AnyValue;
use opentelemetry::Key;
use serde_json::Value;

use crate::telemetry::severity::Severity;

/// Attribute map of a log record. Insertion order is irrelevant.
pub type Attributes = serde_json::Map<String, Value>;

/// Build an attribute map from a `json!({..})` object literal.
///
/// Non-object values yield an empty map.
pub fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// The normalized unit flowing through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub severity: Severity,
    /// Free-form message, string or structured.
    pub body: Value,
    pub attributes: Attributes,
}

impl LogRecord {
    pub fn new(severity: Severity, body: impl Into<Value>, attributes: Attributes) -> Self {
        Self {
            severity,
            body: body.into(),
            attributes,
        }
    }
}

/// Convert a JSON value into the OpenTelemetry attribute value model.
pub(crate) fn to_any_value(value: Value) -> AnyValue {
    match value {
        Value::Null => AnyValue::String("null".into()),
        Value::Bool(b) => AnyValue::Boolean(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                AnyValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                AnyValue::Double(f)
            } else {
                AnyValue::String(n.to_string().into())
            }
        }
        Value::String(s) => AnyValue::String(s.into()),
        Value::Array(items) => {
            AnyValue::ListAny(Box::new(items.into_iter().map(to_any_value).collect()))
        }
        Value::Object(map) => AnyValue::Map(Box::new(
            map.into_iter()
                .map(|(key, value)| (Key::new(key), to_any_value(value)))
                .collect(),
        )),
    }
}

//! Schemaless JSON → host value bridge.
//!
//! Newline-delimited JSON is the schemaless representation the CLI feeds
//! the pipeline with. The mapping is total: every JSON value has a host
//! value shape, so conversion errors can only arise later, from the
//! canonical converter itself.

use connect_core::RecordValue;

/// Convert a JSON value into a host record value.
///
/// Numbers become `Int64` when they fit, `Float64` otherwise. Objects
/// become maps with string keys.
pub fn record_value_from_json(json: &serde_json::Value) -> RecordValue {
    match json {
        serde_json::Value::Null => RecordValue::Null,
        serde_json::Value::Bool(b) => RecordValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                RecordValue::Int64(i)
            } else {
                // u64 beyond i64::MAX or a fractional number
                RecordValue::Float64(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => RecordValue::String(s.clone()),
        serde_json::Value::Array(items) => {
            RecordValue::Array(items.iter().map(record_value_from_json).collect())
        }
        serde_json::Value::Object(entries) => RecordValue::Map(
            entries
                .iter()
                .map(|(key, value)| {
                    (
                        RecordValue::String(key.clone()),
                        record_value_from_json(value),
                    )
                })
                .collect(),
        ),
    }
}

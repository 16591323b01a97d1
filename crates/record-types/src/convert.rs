//! Forward conversion: host record value → canonical value.
//!
//! [`convert`] turns a `(Option<Schema>, RecordValue)` pair into a
//! [`Value`], recursively. The rules apply in priority order:
//!
//! 1. A null value resolves through the schema's default, then its
//!    optional flag, and otherwise fails.
//! 2. Without a schema the variant is classified from the value's runtime
//!    shape alone.
//! 3. With a schema the declared type dispatches the conversion; narrow
//!    integers widen to int64, float32 widens to float64, and any other
//!    variant than the declared one is a type mismatch.
//!
//! Errors are total failures: no partial document is ever produced.

use crate::error::{ConvertError, Result};
use connect_core::{Document, RecordValue, Schema, SchemaType, Value};

/// Convert a host value under an optional schema to its canonical form.
pub fn convert(schema: Option<&Schema>, value: &RecordValue) -> Result<Value> {
    if value.is_null() {
        let Some(schema) = schema else {
            return Ok(Value::Null);
        };
        // A null default carries no information, so it does not terminate
        // the resolution chain.
        if let Some(default) = &schema.default {
            if !default.is_null() {
                return convert(Some(schema), default);
            }
        }
        return if schema.optional {
            Ok(Value::Null)
        } else {
            Err(ConvertError::NullForRequired)
        };
    }

    match schema {
        None => convert_schemaless(value),
        Some(schema) => convert_typed(schema, value),
    }
}

/// Convert a host value and require the result to be a document.
///
/// This is the entry point the pipeline uses on every record value: a
/// top-level result that is not map-shaped cannot become a property
/// document and fails outright.
pub fn convert_to_document(schema: Option<&Schema>, value: &RecordValue) -> Result<Document> {
    match convert(schema, value)? {
        Value::Document(doc) => Ok(doc),
        other => Err(ConvertError::NotADocument {
            schema: schema.map(Schema::type_name).unwrap_or("unknown schema"),
            actual: other.type_name(),
        }),
    }
}

/// Classify and convert a value that arrived without a schema.
fn convert_schemaless(value: &RecordValue) -> Result<Value> {
    match value {
        RecordValue::Null => Ok(Value::Null),
        RecordValue::Bool(b) => Ok(Value::Bool(*b)),
        RecordValue::Int8(v) => Ok(Value::Int64(i64::from(*v))),
        RecordValue::Int16(v) => Ok(Value::Int64(i64::from(*v))),
        RecordValue::Int32(v) => Ok(Value::Int64(i64::from(*v))),
        RecordValue::Int64(v) => Ok(Value::Int64(*v)),
        RecordValue::Float32(v) => Ok(Value::Float64(f64::from(*v))),
        RecordValue::Float64(v) => Ok(Value::Float64(*v)),
        RecordValue::String(s) => Ok(Value::String(s.clone())),
        RecordValue::Bytes(b) => Ok(Value::Bytes(b.clone())),
        RecordValue::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(convert(None, item)?);
            }
            Ok(Value::List(list))
        }
        RecordValue::Map(entries) => convert_map_entries(None, None, entries),
        // A struct always carries the schema it was built against; arriving
        // here without a declared schema means the two cannot agree.
        RecordValue::Struct(_) => Err(ConvertError::MismatchingSchema),
    }
}

/// Convert a value against its declared schema type.
fn convert_typed(schema: &Schema, value: &RecordValue) -> Result<Value> {
    match (&schema.schema_type, value) {
        // Sign-preserving numeric widening for the narrow integer kinds
        (SchemaType::Int8, RecordValue::Int8(v)) => Ok(Value::Int64(i64::from(*v))),
        (SchemaType::Int16, RecordValue::Int16(v)) => Ok(Value::Int64(i64::from(*v))),
        (SchemaType::Int32, RecordValue::Int32(v)) => Ok(Value::Int64(i64::from(*v))),
        (SchemaType::Int64, RecordValue::Int64(v)) => Ok(Value::Int64(*v)),

        // Binary widening, not a lexical reparse
        (SchemaType::Float32, RecordValue::Float32(v)) => Ok(Value::Float64(f64::from(*v))),
        (SchemaType::Float64, RecordValue::Float64(v)) => Ok(Value::Float64(*v)),

        (SchemaType::Bool, RecordValue::Bool(b)) => Ok(Value::Bool(*b)),
        (SchemaType::String, RecordValue::String(s)) => Ok(Value::String(s.clone())),
        (SchemaType::Bytes, RecordValue::Bytes(b)) => Ok(Value::Bytes(b.clone())),

        (SchemaType::Array { element }, RecordValue::Array(items)) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(convert(element.as_deref(), item)?);
            }
            Ok(Value::List(list))
        }

        (
            SchemaType::Map {
                key,
                value: value_schema,
            },
            RecordValue::Map(entries),
        ) => convert_map_entries(key.as_deref(), value_schema.as_deref(), entries),

        (SchemaType::Struct { fields }, RecordValue::Struct(struct_value)) => {
            if *struct_value.schema != *schema {
                return Err(ConvertError::MismatchingSchema);
            }
            let mut doc = Document::with_capacity(fields.len());
            for (name, field_schema) in fields {
                // A field the host never set resolves like a null value
                // under that field's own schema.
                let field_value = struct_value.get(name).unwrap_or(&RecordValue::Null);
                doc.insert(name.clone(), convert(Some(field_schema), field_value)?);
            }
            Ok(Value::Document(doc))
        }

        _ => Err(ConvertError::TypeMismatch {
            expected: schema.type_name(),
            actual: value.type_name(),
        }),
    }
}

/// Convert map entries into a document, stringifying converted keys.
///
/// Non-string keys are not rejected: whatever the key converts to is
/// rendered through its canonical text form.
fn convert_map_entries(
    key_schema: Option<&Schema>,
    value_schema: Option<&Schema>,
    entries: &[(RecordValue, RecordValue)],
) -> Result<Value> {
    let mut doc = Document::with_capacity(entries.len());
    for (key, value) in entries {
        let converted_key = convert(key_schema, key)?;
        let converted_value = convert(value_schema, value)?;
        doc.insert(converted_key.key_string(), converted_value);
    }
    Ok(Value::Document(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_core::StructValue;

    #[test]
    fn test_integer_widening() {
        assert_eq!(
            convert(Some(&Schema::int8()), &RecordValue::Int8(5)).unwrap(),
            Value::Int64(5)
        );
        assert_eq!(
            convert(Some(&Schema::int16()), &RecordValue::Int16(5)).unwrap(),
            Value::Int64(5)
        );
        assert_eq!(
            convert(Some(&Schema::int32()), &RecordValue::Int32(-7)).unwrap(),
            Value::Int64(-7)
        );
        assert_eq!(
            convert(Some(&Schema::int64()), &RecordValue::Int64(i64::MAX)).unwrap(),
            Value::Int64(i64::MAX)
        );

        // Widening preserves sign
        assert_eq!(
            convert(Some(&Schema::int8()), &RecordValue::Int8(-1)).unwrap(),
            Value::Int64(-1)
        );
    }

    #[test]
    fn test_float_widening() {
        assert_eq!(
            convert(Some(&Schema::float32()), &RecordValue::Float32(1.5)).unwrap(),
            Value::Float64(1.5)
        );
        assert_eq!(
            convert(Some(&Schema::float64()), &RecordValue::Float64(1.23)).unwrap(),
            Value::Float64(1.23)
        );
    }

    #[test]
    fn test_primitive_passthrough() {
        assert_eq!(
            convert(Some(&Schema::bool()), &RecordValue::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            convert(Some(&Schema::string()), &RecordValue::from("hello")).unwrap(),
            Value::String("hello".to_string())
        );
        assert_eq!(
            convert(Some(&Schema::bytes()), &RecordValue::Bytes(vec![1, 2])).unwrap(),
            Value::Bytes(vec![1, 2])
        );
    }

    #[test]
    fn test_type_mismatch_names_both_sides() {
        let err = convert(Some(&Schema::int32()), &RecordValue::from("nope")).unwrap_err();
        match err {
            ConvertError::TypeMismatch { expected, actual } => {
                assert_eq!(expected, "INT32");
                assert_eq!(actual, "string");
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }

        // Exact width is required; no silent narrowing or widening of the
        // host value itself.
        assert!(convert(Some(&Schema::int8()), &RecordValue::Int16(1)).is_err());
        assert!(convert(Some(&Schema::float64()), &RecordValue::Float32(1.0)).is_err());
    }

    #[test]
    fn test_null_optional_without_default() {
        assert_eq!(
            convert(Some(&Schema::string().optional()), &RecordValue::Null).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_null_required_without_default() {
        let err = convert(Some(&Schema::string()), &RecordValue::Null).unwrap_err();
        assert!(matches!(err, ConvertError::NullForRequired));
    }

    #[test]
    fn test_null_with_default() {
        let schema = Schema::int16().with_default(RecordValue::Int16(9));
        assert_eq!(
            convert(Some(&schema), &RecordValue::Null).unwrap(),
            Value::Int64(9)
        );
    }

    #[test]
    fn test_null_without_any_schema() {
        assert_eq!(convert(None, &RecordValue::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_array_with_element_schema() {
        let schema = Schema::array(Schema::int32());
        let value = RecordValue::Array(vec![RecordValue::Int32(1), RecordValue::Int32(2)]);
        assert_eq!(
            convert(Some(&schema), &value).unwrap(),
            Value::List(vec![Value::Int64(1), Value::Int64(2)])
        );

        // An element violating the element schema fails the whole array
        let bad = RecordValue::Array(vec![RecordValue::Int32(1), RecordValue::from("x")]);
        assert!(convert(Some(&schema), &bad).is_err());
    }

    #[test]
    fn test_map_stringifies_keys() {
        let schema = Schema::map(Schema::int32(), Schema::string());
        let value = RecordValue::Map(vec![(RecordValue::Int32(7), RecordValue::from("seven"))]);
        let converted = convert(Some(&schema), &value).unwrap();
        let doc = converted.as_document().unwrap();
        assert_eq!(doc.get("7"), Some(&Value::String("seven".to_string())));
    }

    #[test]
    fn test_struct_conversion_in_declaration_order() {
        let schema = Schema::struct_of(vec![
            ("id", Schema::int64()),
            ("name", Schema::string()),
            ("score", Schema::float32().optional()),
        ]);
        let value = StructValue::new(schema.clone())
            .with("id", RecordValue::Int64(1))
            .with("name", RecordValue::from("Alice"));

        let converted = convert(Some(&schema), &RecordValue::Struct(value)).unwrap();
        let doc = converted.as_document().unwrap();
        assert_eq!(doc.get("id"), Some(&Value::Int64(1)));
        assert_eq!(doc.get("name"), Some(&Value::String("Alice".to_string())));
        // The unset optional field resolves to null rather than vanishing
        assert_eq!(doc.get("score"), Some(&Value::Null));
    }

    #[test]
    fn test_struct_missing_required_field() {
        let schema = Schema::struct_of(vec![("id", Schema::int64())]);
        let value = StructValue::new(schema.clone());
        let err = convert(Some(&schema), &RecordValue::Struct(value)).unwrap_err();
        assert!(matches!(err, ConvertError::NullForRequired));
    }

    #[test]
    fn test_struct_schema_mismatch() {
        let declared = Schema::struct_of(vec![("id", Schema::int64())]);
        let embedded = Schema::struct_of(vec![("id", Schema::int32())]);
        let value = StructValue::new(embedded).with("id", RecordValue::Int32(1));
        let err = convert(Some(&declared), &RecordValue::Struct(value)).unwrap_err();
        assert!(matches!(err, ConvertError::MismatchingSchema));
    }

    #[test]
    fn test_struct_field_roundtrip() {
        // Converting then re-reading every declared field yields the
        // original (widened) values.
        let schema = Schema::struct_of(vec![
            ("a", Schema::int8()),
            ("b", Schema::int16()),
            ("c", Schema::int32()),
            ("d", Schema::int64()),
            ("e", Schema::float32()),
            ("f", Schema::float64()),
            ("g", Schema::bool()),
            ("h", Schema::string()),
        ]);
        let value = StructValue::new(schema.clone())
            .with("a", RecordValue::Int8(-8))
            .with("b", RecordValue::Int16(16))
            .with("c", RecordValue::Int32(-32))
            .with("d", RecordValue::Int64(64))
            .with("e", RecordValue::Float32(0.5))
            .with("f", RecordValue::Float64(2.25))
            .with("g", RecordValue::Bool(true))
            .with("h", RecordValue::from("text"));

        let doc = convert_to_document(Some(&schema), &RecordValue::Struct(value)).unwrap();
        assert_eq!(doc.len(), 8);
        assert_eq!(doc["a"], Value::Int64(-8));
        assert_eq!(doc["b"], Value::Int64(16));
        assert_eq!(doc["c"], Value::Int64(-32));
        assert_eq!(doc["d"], Value::Int64(64));
        assert_eq!(doc["e"], Value::Float64(0.5));
        assert_eq!(doc["f"], Value::Float64(2.25));
        assert_eq!(doc["g"], Value::Bool(true));
        assert_eq!(doc["h"], Value::String("text".to_string()));
    }

    #[test]
    fn test_schemaless_classification() {
        assert_eq!(
            convert(None, &RecordValue::Int16(3)).unwrap(),
            Value::Int64(3)
        );
        assert_eq!(
            convert(None, &RecordValue::Float32(1.5)).unwrap(),
            Value::Float64(1.5)
        );
        assert_eq!(
            convert(None, &RecordValue::Bytes(vec![0xff])).unwrap(),
            Value::Bytes(vec![0xff])
        );

        let nested = RecordValue::Map(vec![(
            RecordValue::from("items"),
            RecordValue::Array(vec![RecordValue::Int64(1), RecordValue::from("two")]),
        )]);
        let doc = convert_to_document(None, &nested).unwrap();
        assert_eq!(
            doc["items"],
            Value::List(vec![Value::Int64(1), Value::String("two".to_string())])
        );
    }

    #[test]
    fn test_schemaless_struct_is_rejected() {
        let value = StructValue::new(Schema::struct_of(vec![("id", Schema::int64())]))
            .with("id", RecordValue::Int64(1));
        let err = convert(None, &RecordValue::Struct(value)).unwrap_err();
        assert!(matches!(err, ConvertError::MismatchingSchema));
    }

    #[test]
    fn test_convert_to_document_rejects_non_document() {
        let err = convert_to_document(Some(&Schema::string()), &RecordValue::from("x")).unwrap_err();
        match err {
            ConvertError::NotADocument { schema, actual } => {
                assert_eq!(schema, "STRING");
                assert_eq!(actual, "string");
            }
            other => panic!("expected NotADocument, got {other:?}"),
        }

        let err = convert_to_document(None, &RecordValue::Int64(1)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::NotADocument {
                schema: "unknown schema",
                ..
            }
        ));
    }
}

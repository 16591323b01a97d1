//! Vector strategies.

use super::{ExtractError, VectorStrategy};
use connect_core::{Document, SinkRecord, Value};

/// No vector: records carry none.
pub struct NoVector;

impl VectorStrategy for NoVector {
    fn document_vector(
        &self,
        _record: &SinkRecord,
        _properties: &mut Document,
    ) -> Result<Option<Vec<f32>>, ExtractError> {
        Ok(None)
    }
}

/// Reads the vector from a configured document field.
///
/// An absent or null field yields no vector. A present field must be a
/// list of numbers; elements may mix integers and floats and are narrowed
/// to f32 in order. The field is removed only once the whole vector has
/// been read successfully.
pub struct FieldVector {
    field: String,
}

impl FieldVector {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl VectorStrategy for FieldVector {
    fn document_vector(
        &self,
        _record: &SinkRecord,
        properties: &mut Document,
    ) -> Result<Option<Vec<f32>>, ExtractError> {
        let elements = match properties.get(&self.field) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::List(elements)) => elements,
            Some(other) => {
                return Err(ExtractError::MalformedVector {
                    field: self.field.clone(),
                    actual: other.type_name(),
                })
            }
        };

        let mut vector = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                Value::Float64(f) => vector.push(*f as f32),
                Value::Int64(i) => vector.push(*i as f32),
                other => {
                    return Err(ExtractError::MalformedVector {
                        field: self.field.clone(),
                        actual: other.type_name(),
                    })
                }
            }
        }
        properties.remove(&self.field);
        Ok(Some(vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_core::RecordValue;

    fn record() -> SinkRecord {
        SinkRecord::schemaless("test", RecordValue::Null, 0)
    }

    #[test]
    fn test_no_vector() {
        let vector = NoVector
            .document_vector(&record(), &mut Document::new())
            .unwrap();
        assert_eq!(vector, None);
    }

    #[test]
    fn test_missing_field_is_absent_not_an_error() {
        let strategy = FieldVector::new("vector");
        let vector = strategy
            .document_vector(&record(), &mut Document::new())
            .unwrap();
        assert_eq!(vector, None);
    }

    #[test]
    fn test_null_field_is_absent() {
        let strategy = FieldVector::new("vector");
        let mut properties = Document::new();
        properties.insert("vector".to_string(), Value::Null);
        let vector = strategy.document_vector(&record(), &mut properties).unwrap();
        assert_eq!(vector, None);
    }

    #[test]
    fn test_float_list_preserves_order_and_removes_field() {
        let strategy = FieldVector::new("vector");
        let mut properties = Document::new();
        properties.insert(
            "vector".to_string(),
            Value::List(vec![
                Value::Float64(0.5),
                Value::Float64(-1.25),
                Value::Float64(2.0),
            ]),
        );

        let vector = strategy.document_vector(&record(), &mut properties).unwrap();
        assert_eq!(vector, Some(vec![0.5, -1.25, 2.0]));
        assert!(!properties.contains_key("vector"));
    }

    #[test]
    fn test_mixed_numeric_elements_are_narrowed() {
        let strategy = FieldVector::new("vector");
        let mut properties = Document::new();
        properties.insert(
            "vector".to_string(),
            Value::List(vec![Value::Int64(1), Value::Float64(0.5)]),
        );

        let vector = strategy.document_vector(&record(), &mut properties).unwrap();
        assert_eq!(vector, Some(vec![1.0, 0.5]));
    }

    #[test]
    fn test_non_list_field_is_an_error() {
        let strategy = FieldVector::new("vector");
        let mut properties = Document::new();
        properties.insert("vector".to_string(), Value::String("oops".to_string()));

        let err = strategy
            .document_vector(&record(), &mut properties)
            .unwrap_err();
        assert!(matches!(err, ExtractError::MalformedVector { .. }));
    }

    #[test]
    fn test_non_numeric_element_leaves_field_in_place() {
        let strategy = FieldVector::new("vector");
        let mut properties = Document::new();
        properties.insert(
            "vector".to_string(),
            Value::List(vec![Value::Float64(1.0), Value::Bool(true)]),
        );

        let err = strategy
            .document_vector(&record(), &mut properties)
            .unwrap_err();
        assert!(matches!(err, ExtractError::MalformedVector { .. }));
        // Removal is a success-only side effect.
        assert!(properties.contains_key("vector"));
    }
}

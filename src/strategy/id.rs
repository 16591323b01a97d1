//! Identifier strategies.

use super::{ExtractError, IdStrategy};
use base64::Engine;
use connect_core::{Document, RecordValue, SinkRecord};

/// No identifier: the store assigns one.
pub struct NoId;

impl IdStrategy for NoId {
    fn document_id(
        &self,
        _record: &SinkRecord,
        _properties: &mut Document,
    ) -> Result<Option<String>, ExtractError> {
        Ok(None)
    }
}

/// The record's transport key, stringified verbatim.
///
/// An absent key is not an error: it stringifies to "null", the same as a
/// null key.
pub struct RecordKeyId;

impl IdStrategy for RecordKeyId {
    fn document_id(
        &self,
        record: &SinkRecord,
        _properties: &mut Document,
    ) -> Result<Option<String>, ExtractError> {
        Ok(Some(key_text(record.key.as_ref())))
    }
}

fn key_text(key: Option<&RecordValue>) -> String {
    match key {
        None | Some(RecordValue::Null) => "null".to_string(),
        Some(RecordValue::String(s)) => s.clone(),
        Some(RecordValue::Bool(b)) => b.to_string(),
        Some(RecordValue::Int8(v)) => v.to_string(),
        Some(RecordValue::Int16(v)) => v.to_string(),
        Some(RecordValue::Int32(v)) => v.to_string(),
        Some(RecordValue::Int64(v)) => v.to_string(),
        Some(RecordValue::Float32(v)) => v.to_string(),
        Some(RecordValue::Float64(v)) => v.to_string(),
        Some(RecordValue::Bytes(b)) => base64::engine::general_purpose::STANDARD.encode(b),
        Some(other) => format!("{other:?}"),
    }
}

/// A configured document field, hashed into a stable identifier.
///
/// The field is required - an identifier is structurally required for
/// deterministic upserts downstream, so a record without it is a hard
/// failure - and is removed from the document once consumed. The hash is a
/// name-based (version 3) UUID over the field value's text form, so two
/// records carrying the same value always collide onto the same document.
pub struct FieldId {
    field: String,
}

impl FieldId {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl IdStrategy for FieldId {
    fn document_id(
        &self,
        _record: &SinkRecord,
        properties: &mut Document,
    ) -> Result<Option<String>, ExtractError> {
        let value = properties
            .remove(&self.field)
            .ok_or_else(|| ExtractError::MissingIdField {
                field: self.field.clone(),
            })?;
        Ok(Some(name_based_id(&value.key_string())))
    }
}

/// Version-3 UUID over the raw name bytes.
///
/// The digest covers only the name itself - no namespace prefix - so the
/// identifier of a given value is reproducible from the value alone.
fn name_based_id(name: &str) -> String {
    let digest = md5::compute(name.as_bytes());
    uuid::Builder::from_md5_bytes(digest.0).into_uuid().to_string()
}

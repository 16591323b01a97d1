//! Host-native record values and delivered records.
//!
//! [`RecordValue`] is the value tree the ingestion framework hands us,
//! before any conversion: integers and floats at their declared widths,
//! maps with arbitrarily-typed keys, and structs carrying their own schema.
//! [`SinkRecord`] pairs one such value (and its key) with the transport
//! metadata extraction strategies may consult.

use crate::schema::Schema;

/// A value as delivered by the host, prior to canonical conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// 8-bit signed integer
    Int8(i8),

    /// 16-bit signed integer
    Int16(i16),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 32-bit floating point
    Float32(f32),

    /// 64-bit floating point
    Float64(f64),

    /// Text value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// Ordered sequence of values
    Array(Vec<RecordValue>),

    /// Keyed collection; keys are values themselves and are stringified
    /// during conversion, so entries are kept as ordered pairs
    Map(Vec<(RecordValue, RecordValue)>),

    /// Struct value carrying its own schema
    Struct(StructValue),
}

impl RecordValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of this value's runtime variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int8(_) => "int8",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
        }
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for RecordValue {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<f64> for RecordValue {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<bool> for RecordValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A struct value: named fields in declaration order plus the schema the
/// host built it against.
///
/// The embedded schema is compared structurally against the schema the
/// record was delivered under; a mismatch aborts conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// The schema this struct was built against
    pub schema: Box<Schema>,

    fields: Vec<(String, RecordValue)>,
}

impl StructValue {
    /// Create an empty struct value for the given schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Box::new(schema),
            fields: Vec::new(),
        }
    }

    /// Set a field value, builder style.
    pub fn with(mut self, name: impl Into<String>, value: RecordValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&RecordValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Number of fields set on this struct.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One record as delivered by the host ingestion framework.
#[derive(Debug, Clone)]
pub struct SinkRecord {
    /// Transport key, if the record has one
    pub key: Option<RecordValue>,

    /// Record value; absent for tombstones
    pub value: Option<RecordValue>,

    /// Declared schema of the value; absent in schemaless mode
    pub value_schema: Option<Schema>,

    /// Topic the record arrived on
    pub topic: String,

    /// Partition the record arrived on
    pub partition: i32,

    /// Offset of the record within its partition
    pub offset: i64,
}

impl SinkRecord {
    /// Create a record with no key and no schema.
    pub fn schemaless(topic: impl Into<String>, value: RecordValue, offset: i64) -> Self {
        Self {
            key: None,
            value: Some(value),
            value_schema: None,
            topic: topic.into(),
            partition: 0,
            offset,
        }
    }

    /// Set the record key, builder style.
    pub fn with_key(mut self, key: RecordValue) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the value schema, builder style.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.value_schema = Some(schema);
        self
    }
}

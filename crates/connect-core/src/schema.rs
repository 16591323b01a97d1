//! Record schema descriptors.
//!
//! A [`Schema`] describes the declared type of a host value: a primitive
//! kind, an array, a map, or a struct with ordered named fields. Schemas are
//! optional throughout the pipeline - a record without one is converted in
//! schemaless mode - and compare structurally, which is what the struct
//! conversion path relies on to detect a value carrying a different schema
//! than the one it was delivered under.

use crate::record::RecordValue;

/// Declared type of a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// Boolean
    Bool,
    /// Text
    String,
    /// Binary data
    Bytes,
    /// Ordered sequence; `element` is absent when the elements are untyped
    Array { element: Option<Box<Schema>> },
    /// Keyed collection; key/value schemas are absent when untyped
    Map {
        key: Option<Box<Schema>>,
        value: Option<Box<Schema>>,
    },
    /// Named fields in declaration order
    Struct { fields: Vec<(String, Schema)> },
}

impl SchemaType {
    /// Name of this schema type, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Bool => "BOOLEAN",
            Self::String => "STRING",
            Self::Bytes => "BYTES",
            Self::Array { .. } => "ARRAY",
            Self::Map { .. } => "MAP",
            Self::Struct { .. } => "STRUCT",
        }
    }
}

/// Type descriptor for a host value.
///
/// Carries the declared type plus the two modifiers that drive null
/// resolution: whether the value may legally be null, and a default to
/// substitute when it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// The declared type
    pub schema_type: SchemaType,

    /// Whether a null value is accepted for this schema
    pub optional: bool,

    /// Value substituted when the host value is null
    pub default: Option<RecordValue>,
}

impl Schema {
    /// Create a required schema of the given type with no default.
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            optional: false,
            default: None,
        }
    }

    /// Create an int8 schema.
    pub fn int8() -> Self {
        Self::new(SchemaType::Int8)
    }

    /// Create an int16 schema.
    pub fn int16() -> Self {
        Self::new(SchemaType::Int16)
    }

    /// Create an int32 schema.
    pub fn int32() -> Self {
        Self::new(SchemaType::Int32)
    }

    /// Create an int64 schema.
    pub fn int64() -> Self {
        Self::new(SchemaType::Int64)
    }

    /// Create a float32 schema.
    pub fn float32() -> Self {
        Self::new(SchemaType::Float32)
    }

    /// Create a float64 schema.
    pub fn float64() -> Self {
        Self::new(SchemaType::Float64)
    }

    /// Create a boolean schema.
    pub fn bool() -> Self {
        Self::new(SchemaType::Bool)
    }

    /// Create a string schema.
    pub fn string() -> Self {
        Self::new(SchemaType::String)
    }

    /// Create a bytes schema.
    pub fn bytes() -> Self {
        Self::new(SchemaType::Bytes)
    }

    /// Create an array schema with a typed element.
    pub fn array(element: Schema) -> Self {
        Self::new(SchemaType::Array {
            element: Some(Box::new(element)),
        })
    }

    /// Create an array schema with untyped elements.
    pub fn untyped_array() -> Self {
        Self::new(SchemaType::Array { element: None })
    }

    /// Create a map schema with typed keys and values.
    pub fn map(key: Schema, value: Schema) -> Self {
        Self::new(SchemaType::Map {
            key: Some(Box::new(key)),
            value: Some(Box::new(value)),
        })
    }

    /// Create a map schema with untyped keys and values.
    pub fn untyped_map() -> Self {
        Self::new(SchemaType::Map {
            key: None,
            value: None,
        })
    }

    /// Create a struct schema from (name, schema) fields in declaration
    /// order.
    pub fn struct_of(fields: Vec<(impl Into<String>, Schema)>) -> Self {
        Self::new(SchemaType::Struct {
            fields: fields
                .into_iter()
                .map(|(name, schema)| (name.into(), schema))
                .collect(),
        })
    }

    /// Mark this schema as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Attach a default value to this schema.
    pub fn with_default(mut self, default: RecordValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Name of this schema's declared type.
    pub fn type_name(&self) -> &'static str {
        self.schema_type.name()
    }
}

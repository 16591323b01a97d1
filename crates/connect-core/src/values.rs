//! Canonical value representation.
//!
//! Every record that enters the pipeline is converted into a tree of
//! [`Value`]s before anything downstream touches it. No host-native type
//! escapes the converter: the eight variants below are the entire vocabulary
//! the batching and extraction layers ever see.

use base64::Engine;
use serde::Serialize;
use std::collections::HashMap;

/// A property document: one record's converted properties, keyed by field
/// name. Extraction strategies may remove the fields they consume.
pub type Document = HashMap<String, Value>;

/// Store-agnostic canonical value.
///
/// Narrow integers and floats are widened during conversion, so only the
/// 64-bit numeric variants exist here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// 64-bit signed integer (int8/int16/int32 widen into this)
    Int64(i64),

    /// 64-bit floating point (float32 widens into this)
    Float64(f64),

    /// Text value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// Ordered sequence of values
    List(Vec<Value>),

    /// String-keyed map of values
    Document(Document),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get this value as a list.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get this value as a document.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Name of this value's variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int64(_) => "int64",
            Self::Float64(_) => "float64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Document(_) => "document",
        }
    }

    /// Canonical text form of this value.
    ///
    /// Used wherever a value must become a string: map keys in converted
    /// documents and the input to the name-based identifier hash. Strings
    /// pass through verbatim, other primitives stringify, bytes are base64
    /// encoded, and composites serialize to JSON.
    pub fn key_string(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int64(i) => i.to_string(),
            Self::Float64(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::Bytes(b) => base64::engine::general_purpose::STANDARD.encode(b),
            Self::List(_) | Self::Document(_) => {
                serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
            }
        }
    }
}

//! Pluggable identifier and vector extraction.
//!
//! After conversion, two strategies inspect each record: one derives the
//! document identifier, one derives the optional embedding vector. Both may
//! remove the fields they consume from the property document; both must be
//! deterministic so redelivered records land on the same document.
//!
//! Strategies are selected through [`IdStrategyKind`] and
//! [`VectorStrategyKind`] - configuration enumerators mapped to
//! constructors at validation time, so an invalid selection can never
//! survive into a running pipeline.

pub mod id;
pub mod vector;

use clap::ValueEnum;
use connect_core::{Document, SinkRecord};
use thiserror::Error;

pub use id::{FieldId, NoId, RecordKeyId};
pub use vector::{FieldVector, NoVector};

/// Errors raised while extracting an identifier or a vector.
///
/// Extraction failures abort the whole delivery, exactly like conversion
/// failures.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("document id field '{field}' is missing from the record properties")]
    MissingIdField { field: String },

    #[error("cannot convert field '{field}' to a vector: {actual} is not a sequence of numbers")]
    MalformedVector {
        field: String,
        actual: &'static str,
    },
}

/// Derives a document identifier from a record.
pub trait IdStrategy: Send + Sync {
    /// Return the identifier for this record, removing any consumed field
    /// from `properties`. `None` lets the store assign its own identifier.
    fn document_id(
        &self,
        record: &SinkRecord,
        properties: &mut Document,
    ) -> Result<Option<String>, ExtractError>;
}

/// Derives an optional embedding vector from a record.
pub trait VectorStrategy: Send + Sync {
    /// Return the vector for this record, removing any consumed field from
    /// `properties`. A missing source field is not an error: vectors are
    /// optional enrichment, unlike identifiers.
    fn document_vector(
        &self,
        record: &SinkRecord,
        properties: &mut Document,
    ) -> Result<Option<Vec<f32>>, ExtractError>;
}

/// Identifier strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdStrategyKind {
    /// The store assigns its own identifiers
    None,
    /// The record's transport key, stringified verbatim
    RecordKey,
    /// A configured document field, hashed into a stable identifier
    Field,
}

impl IdStrategyKind {
    /// Resolve this selector to its strategy.
    pub fn build(self, id_field: &str) -> Box<dyn IdStrategy> {
        match self {
            Self::None => Box::new(NoId),
            Self::RecordKey => Box::new(RecordKeyId),
            Self::Field => Box::new(FieldId::new(id_field)),
        }
    }
}

/// Vector strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VectorStrategyKind {
    /// Records carry no vector
    None,
    /// A configured document field holds the vector
    Field,
}

impl VectorStrategyKind {
    /// Resolve this selector to its strategy.
    pub fn build(self, vector_field: &str) -> Box<dyn VectorStrategy> {
        match self {
            Self::None => Box::new(NoVector),
            Self::Field => Box::new(FieldVector::new(vector_field)),
        }
    }
}

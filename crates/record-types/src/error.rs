//! Error types for record conversion.

use thiserror::Error;

/// Errors that can occur while converting a host value to its canonical
/// form.
///
/// A conversion error is never partial: the record that produced it yields
/// no document at all, and the whole delivery it belongs to is aborted.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("null value for field that is required and has no default value")]
    NullForRequired,

    #[error("invalid type for {expected}: {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("mismatching schema")]
    MismatchingSchema,

    #[error("cannot convert {schema} value to a property document: {actual} is not a document")]
    NotADocument {
        schema: &'static str,
        actual: &'static str,
    },
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

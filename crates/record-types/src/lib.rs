//! Record conversion for vector-connect.
//!
//! This crate owns the conversion from host-delivered record values to the
//! canonical property documents the rest of the pipeline works with:
//!
//! - [`convert`] / [`convert_to_document`] - the recursive, schema-driven
//!   converter
//! - [`record_value_from_json`] - the schemaless JSON bridge used by the
//!   JSONL feed
//!
//! The converter never produces a partial result: any schema or type
//! violation fails the record with a [`ConvertError`].

pub mod convert;
pub mod error;
pub mod json;

pub use convert::{convert, convert_to_document};
pub use error::{ConvertError, Result};
pub use json::record_value_from_json;

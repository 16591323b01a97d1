//! Core types for the vector-connect pipeline.
//!
//! This crate defines the three value layers every other crate builds on:
//!
//! - [`RecordValue`] - the host-native value tree delivered by the ingestion
//!   framework, optionally tagged with a [`Schema`]
//! - [`Value`] - the canonical, store-agnostic value every record is
//!   converted into
//! - [`SinkRecord`] - one delivered record plus its transport metadata
//!   (topic, partition, offset)

pub mod record;
pub mod schema;
pub mod values;

pub use record::{RecordValue, SinkRecord, StructValue};
pub use schema::{Schema, SchemaType};
pub use values::{Document, Value};

//! vector-connect: a sink connector for vector stores.
//!
//! Records arrive from the host ingestion framework as `(schema, value)`
//! pairs plus transport metadata, get converted into canonical property
//! documents, enriched with a document identifier and an optional
//! embedding vector, and shipped to the store in size-bounded batches.
//!
//! The pieces, in pipeline order:
//!
//! - [`record_types::convert_to_document`] - schema-driven conversion
//! - [`router::CollectionRouter`] - topic → collection resolution
//! - [`strategy`] - pluggable identifier and vector extraction
//! - [`vector_sink::BatchUploader`] - batching, bounded retry,
//!   flush/close lifecycle
//! - [`task::SinkTask`] - the orchestrator the host drives through
//!   `put` / `checkpoint` / `stop`
//!
//! Configuration is parsed and validated once, at startup, by
//! [`config::SinkConfig`].

pub mod config;
pub mod console;
pub mod jsonl;
pub mod router;
pub mod strategy;
pub mod task;

pub use config::{ConfigError, SinkConfig};
pub use console::ConsoleStore;
pub use router::CollectionRouter;
pub use task::SinkTask;

// Re-export the member crates the public API surfaces.
pub use connect_core::{Document, RecordValue, Schema, SchemaType, SinkRecord, StructValue, Value};
pub use record_types::{convert, convert_to_document, ConvertError};
pub use vector_sink::{
    BatchConfig, BatchUploader, ConsistencyLevel, RetryPolicy, StoreAuth, StoreConfig, StoreError,
    UploadError, UploadUnit, VectorStore,
};

//! VectorStore trait definition.
//!
//! This trait is the boundary between the pipeline and the remote store's
//! client library. The uploader only ever submits whole batches through
//! it; everything about the wire protocol stays on the other side.
//!
//! # Usage Pattern
//!
//! The uploader and the sink task are generic over the store, so calls are
//! statically dispatched after monomorphization:
//!
//! ```ignore
//! let store = Arc::new(MyStoreClient::connect(&store_config).await?);
//! let mut task = SinkTask::new(&config, store)?;
//! task.put(records).await?;
//! ```

use crate::config::ConsistencyLevel;
use crate::error::StoreError;
use connect_core::Document;
use serde::Serialize;

/// One converted record, ready for upload.
///
/// Constructed fresh per record by the orchestrator and owned by the
/// uploader from accumulation until the batch carrying it is acknowledged
/// or permanently failed.
#[derive(Debug, Clone, Serialize)]
pub struct UploadUnit {
    /// Destination collection
    pub collection: String,
    /// Converted record properties
    pub properties: Document,
    /// Document identifier, if an id strategy produced one
    pub id: Option<String>,
    /// Embedding vector, if a vector strategy produced one
    pub vector: Option<Vec<f32>>,
}

/// Batched-write handle to a remote vector store.
///
/// Implementations own connection pooling and the wire protocol. A failed
/// write reports whether the cause was a connection failure, a timeout, or
/// a rejection, which is what drives the uploader's retry budgets.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Write a batch of upload units at the given consistency level.
    ///
    /// The batch is all-or-nothing from the pipeline's point of view: an
    /// error means none of the units may be treated as durable.
    async fn write_batch(
        &self,
        units: &[UploadUnit],
        consistency: ConsistencyLevel,
    ) -> Result<(), StoreError>;
}

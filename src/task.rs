//! The sink task: one record collection in, one flushed delivery out.

use crate::config::{ConfigError, SinkConfig};
use crate::router::CollectionRouter;
use crate::strategy::{IdStrategy, VectorStrategy};
use anyhow::Context;
use connect_core::{RecordValue, SinkRecord};
use record_types::convert_to_document;
use std::sync::Arc;
use tracing::debug;
use vector_sink::{BatchUploader, UploadUnit, VectorStore};

/// Orchestrates the pipeline for one connector instance.
///
/// Each delivered record is converted to a property document, routed to a
/// collection, enriched with an identifier and an optional vector, and
/// accumulated into the uploader. Every delivery ends with a flush, so
/// control only returns to the host once the store has acknowledged
/// everything - the invariant the host's offset commits depend on.
///
/// The task owns its uploader exclusively; `&mut self` keeps a second
/// producer out by construction.
pub struct SinkTask<S: VectorStore + 'static> {
    router: CollectionRouter,
    id_strategy: Box<dyn IdStrategy>,
    vector_strategy: Box<dyn VectorStrategy>,
    uploader: BatchUploader<S>,
}

impl<S: VectorStore + 'static> SinkTask<S> {
    /// Build a task from a validated configuration and a store client.
    pub fn new(config: &SinkConfig, client: Arc<S>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            router: CollectionRouter::new(&config.collection_mapping),
            id_strategy: config
                .document_id_strategy
                .build(&config.document_id_field),
            vector_strategy: config.vector_strategy.build(&config.vector_field),
            uploader: BatchUploader::new(client, config.batch_config()?, config.retry_policy()),
        })
    }

    /// Process one delivered record collection.
    ///
    /// Any conversion, extraction, or upload failure aborts the whole
    /// delivery; the host sees the error before it can commit offsets and
    /// will redeliver the collection.
    pub async fn put(&mut self, records: Vec<SinkRecord>) -> anyhow::Result<()> {
        let count = records.len();
        for record in records {
            let unit = self.upload_unit(&record).with_context(|| {
                format!(
                    "failed to process record at {}/{}:{}",
                    record.topic, record.partition, record.offset
                )
            })?;
            self.uploader.accumulate(unit).await?;
        }
        // Flushing here keeps error handling simple: a delivery either
        // lands in full or fails in full.
        self.uploader.flush().await?;
        debug!(count, "delivery flushed");
        Ok(())
    }

    fn upload_unit(&self, record: &SinkRecord) -> anyhow::Result<UploadUnit> {
        let value = record.value.as_ref().unwrap_or(&RecordValue::Null);
        let mut properties = convert_to_document(record.value_schema.as_ref(), value)?;
        let collection = self.router.resolve(&record.topic);
        let id = self.id_strategy.document_id(record, &mut properties)?;
        let vector = self.vector_strategy.document_vector(record, &mut properties)?;
        Ok(UploadUnit {
            collection,
            properties,
            id,
            vector,
        })
    }

    /// Host checkpoint hook: force outstanding uploads to resolve.
    pub async fn checkpoint(&mut self) -> anyhow::Result<()> {
        self.uploader.flush().await?;
        Ok(())
    }

    /// Host shutdown hook: flush and release the uploader.
    pub async fn stop(&mut self) -> anyhow::Result<()> {
        self.uploader.close().await?;
        Ok(())
    }
}

//! In-memory store for tests.
//!
//! `MemoryStore` records every batch it is handed and can be scripted to
//! fail upcoming writes, which is how the uploader's retry and timeout
//! paths are exercised without a real store.

use crate::config::ConsistencyLevel;
use crate::error::StoreError;
use crate::traits::{UploadUnit, VectorStore};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// A [`VectorStore`] that keeps everything in memory.
#[derive(Default)]
pub struct MemoryStore {
    batches: Mutex<Vec<Vec<UploadUnit>>>,
    failures: Mutex<VecDeque<StoreError>>,
    last_consistency: Mutex<Option<ConsistencyLevel>>,
    delay: Option<Duration>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write sleep before completing, to provoke flush
    /// timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Script the next write to fail with the given error.
    ///
    /// Failures queue up and are consumed in order, one per write attempt,
    /// before any write succeeds.
    pub fn fail_next(&self, error: StoreError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// All successfully written batches, in arrival order.
    pub fn batches(&self) -> Vec<Vec<UploadUnit>> {
        self.batches.lock().unwrap().clone()
    }

    /// All successfully written units, flattened in arrival order.
    pub fn units(&self) -> Vec<UploadUnit> {
        self.batches.lock().unwrap().concat()
    }

    /// Number of successfully written batches.
    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    /// Number of successfully written units.
    pub fn unit_count(&self) -> usize {
        self.batches.lock().unwrap().iter().map(Vec::len).sum()
    }

    /// Consistency level of the most recent successful write.
    pub fn last_consistency(&self) -> Option<ConsistencyLevel> {
        *self.last_consistency.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl VectorStore for MemoryStore {
    async fn write_batch(
        &self,
        units: &[UploadUnit],
        consistency: ConsistencyLevel,
    ) -> Result<(), StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        *self.last_consistency.lock().unwrap() = Some(consistency);
        self.batches.lock().unwrap().push(units.to_vec());
        Ok(())
    }
}

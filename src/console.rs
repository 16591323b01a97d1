//! Console store: upload units as JSON lines on stdout.
//!
//! Stands in for a real store client at the CLI boundary - useful for
//! previewing what a configuration would ship. Dry-run mode counts
//! without printing.

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;
use vector_sink::{ConsistencyLevel, StoreError, UploadUnit, VectorStore};

/// A [`VectorStore`] that writes each unit as one JSON line.
pub struct ConsoleStore {
    dry_run: bool,
    written: AtomicUsize,
}

impl ConsoleStore {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            written: AtomicUsize::new(0),
        }
    }

    /// Number of units written (or counted, in dry-run mode) so far.
    pub fn written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl VectorStore for ConsoleStore {
    async fn write_batch(
        &self,
        units: &[UploadUnit],
        consistency: ConsistencyLevel,
    ) -> Result<(), StoreError> {
        for unit in units {
            if !self.dry_run {
                let line = serde_json::to_string(unit)
                    .map_err(|e| StoreError::Rejected(format!("cannot render upload unit: {e}")))?;
                println!("{line}");
            }
        }
        self.written.fetch_add(units.len(), Ordering::Relaxed);
        debug!(
            batch_len = units.len(),
            consistency = %consistency,
            dry_run = self.dry_run,
            "batch written to console"
        );
        Ok(())
    }
}

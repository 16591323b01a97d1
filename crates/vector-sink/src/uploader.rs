//! Batched upload pipeline.
//!
//! [`BatchUploader`] accumulates converted records and ships them to the
//! store in size-bounded batches. Full batches are submitted
//! asynchronously, bounded by a pool of `pool_size` concurrent
//! submissions; `flush` forces everything buffered and in flight to
//! resolve before it returns, which is what lets the host gate its offset
//! commits on durable uploads.
//!
//! Lifecycle: Uninitialized → Active (first accumulate) → Draining
//! (close started) → Closed. Closing twice is a no-op.

use crate::config::{BatchConfig, ConsistencyLevel, RetryPolicy};
use crate::error::{StoreError, UploadError};
use crate::traits::{UploadUnit, VectorStore};
use std::mem;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Active,
    Draining,
    Closed,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Active => "active",
            Self::Draining => "draining",
            Self::Closed => "closed",
        }
    }
}

/// Batch buffer plus the submission pool, created lazily on first use.
struct Inner {
    buffer: Vec<UploadUnit>,
    pool: Arc<Semaphore>,
    in_flight: JoinSet<Result<(), UploadError>>,
}

impl Inner {
    fn new(batch_size: usize, pool_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(batch_size),
            pool: Arc::new(Semaphore::new(pool_size)),
            in_flight: JoinSet::new(),
        }
    }

    /// Hand a full batch to a spawned submission task.
    ///
    /// Blocks only while the pool is saturated.
    async fn submit<S: VectorStore + 'static>(
        &mut self,
        client: Arc<S>,
        units: Vec<UploadUnit>,
        consistency: ConsistencyLevel,
        retry: RetryPolicy,
    ) -> Result<(), UploadError> {
        let permit = Arc::clone(&self.pool)
            .acquire_owned()
            .await
            .map_err(|_| UploadError::Internal("upload pool closed".to_string()))?;

        debug!(batch_len = units.len(), "submitting batch");
        self.in_flight.spawn(async move {
            let result = submit_with_retry(&client, &units, consistency, &retry).await;
            drop(permit);
            result
        });
        Ok(())
    }
}

/// Accumulates upload units and ships them in bounded batches.
///
/// One uploader instance belongs to exactly one pipeline instance; the
/// `&mut self` methods enforce a single producer.
pub struct BatchUploader<S: VectorStore + 'static> {
    client: Arc<S>,
    retry: RetryPolicy,
    config: BatchConfig,
    state: State,
    inner: Option<Inner>,
}

impl<S: VectorStore + 'static> BatchUploader<S> {
    /// Create an uploader over the given store client.
    ///
    /// No resources are allocated until the first `accumulate` call.
    pub fn new(client: Arc<S>, config: BatchConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry,
            config,
            state: State::Uninitialized,
            inner: None,
        }
    }

    /// Append a unit to the current batch.
    ///
    /// When the batch reaches the configured size it is handed off for
    /// asynchronous submission; the only way this call blocks is waiting
    /// for a pool permit.
    pub async fn accumulate(&mut self, unit: UploadUnit) -> Result<(), UploadError> {
        if matches!(self.state, State::Draining | State::Closed) {
            return Err(UploadError::InvalidState {
                op: "accumulate into",
                state: self.state.name(),
            });
        }
        if self.state == State::Uninitialized {
            debug!(
                batch_size = self.config.batch_size,
                pool_size = self.config.pool_size,
                consistency = %self.config.consistency,
                "batch uploader activated"
            );
            self.state = State::Active;
        }

        let batch_size = self.config.batch_size;
        let pool_size = self.config.pool_size;
        let inner = self
            .inner
            .get_or_insert_with(|| Inner::new(batch_size, pool_size));

        inner.buffer.push(unit);
        if inner.buffer.len() >= batch_size {
            let units = mem::take(&mut inner.buffer);
            inner
                .submit(
                    self.client.clone(),
                    units,
                    self.config.consistency,
                    self.retry.clone(),
                )
                .await?;
        }
        Ok(())
    }

    /// Force all buffered and in-flight batches to resolve.
    ///
    /// Blocks for at most the configured await-termination timeout. The
    /// first batch failure is returned after the remaining batches have
    /// resolved; it is never swallowed.
    pub async fn flush(&mut self) -> Result<(), UploadError> {
        match self.state {
            // Nothing was ever accumulated.
            State::Uninitialized => return Ok(()),
            State::Closed => {
                return Err(UploadError::InvalidState {
                    op: "flush",
                    state: self.state.name(),
                })
            }
            State::Active | State::Draining => {}
        }
        let Some(inner) = self.inner.as_mut() else {
            return Ok(());
        };

        if !inner.buffer.is_empty() {
            let units = mem::take(&mut inner.buffer);
            inner
                .submit(
                    self.client.clone(),
                    units,
                    self.config.consistency,
                    self.retry.clone(),
                )
                .await?;
        }

        let await_termination = self.config.await_termination;
        let in_flight = &mut inner.in_flight;
        let drain = async {
            let mut first_failure: Option<UploadError> = None;
            while let Some(joined) = in_flight.join_next().await {
                match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(upload_error)) => {
                        warn!(error = %upload_error, "batch failed during flush");
                        first_failure.get_or_insert(upload_error);
                    }
                    Err(join_error) => {
                        first_failure.get_or_insert(UploadError::Internal(join_error.to_string()));
                    }
                }
            }
            first_failure
        };

        match timeout(await_termination, drain).await {
            Ok(None) => Ok(()),
            Ok(Some(failure)) => Err(failure),
            Err(_) => Err(UploadError::FlushTimeout {
                timeout_ms: await_termination.as_millis() as u64,
            }),
        }
    }

    /// Flush outstanding batches and release pooled resources.
    ///
    /// Idempotent: closing an already-closed uploader is a no-op. The
    /// uploader ends up closed even when the final flush fails; the
    /// failure is still propagated.
    pub async fn close(&mut self) -> Result<(), UploadError> {
        match self.state {
            State::Closed => return Ok(()),
            State::Uninitialized => {
                self.state = State::Closed;
                return Ok(());
            }
            State::Active | State::Draining => {}
        }

        self.state = State::Draining;
        let result = self.flush().await;
        self.state = State::Closed;
        // Dropping the inner aborts anything still stuck in flight and
        // releases the pool.
        self.inner = None;
        debug!("batch uploader closed");
        result
    }
}

/// Submit one batch, retrying connection failures and timeouts against
/// their separate budgets with a fixed interval in between.
async fn submit_with_retry<S: VectorStore>(
    client: &Arc<S>,
    units: &[UploadUnit],
    consistency: ConsistencyLevel,
    retry: &RetryPolicy,
) -> Result<(), UploadError> {
    let mut connection_retries = 0u32;
    let mut timeout_retries = 0u32;
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match client.write_batch(units, consistency).await {
            Ok(()) => {
                debug!(batch_len = units.len(), attempts, "batch acknowledged");
                return Ok(());
            }
            Err(StoreError::Connection(reason))
                if connection_retries < retry.max_connection_retries =>
            {
                connection_retries += 1;
                warn!(
                    %reason,
                    retry = connection_retries,
                    max = retry.max_connection_retries,
                    "connection failure, retrying batch"
                );
                sleep(retry.retry_interval).await;
            }
            Err(StoreError::Timeout(reason)) if timeout_retries < retry.max_timeout_retries => {
                timeout_retries += 1;
                warn!(
                    %reason,
                    retry = timeout_retries,
                    max = retry.max_timeout_retries,
                    "timeout, retrying batch"
                );
                sleep(retry.retry_interval).await;
            }
            Err(source) => {
                return Err(UploadError::BatchFailed {
                    batch_len: units.len(),
                    attempts,
                    source,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use connect_core::Document;
    use std::time::Duration;

    fn test_unit(n: i64) -> UploadUnit {
        let mut properties = Document::new();
        properties.insert("n".to_string(), connect_core::Value::Int64(n));
        UploadUnit {
            collection: "test".to_string(),
            properties,
            id: None,
            vector: None,
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_connection_retries: 3,
            max_timeout_retries: 3,
            retry_interval: Duration::from_millis(1),
        }
    }

    fn small_batches() -> BatchConfig {
        BatchConfig {
            batch_size: 2,
            pool_size: 2,
            await_termination: Duration::from_millis(5_000),
            consistency: ConsistencyLevel::Quorum,
        }
    }

    #[tokio::test]
    async fn test_auto_flush_at_batch_size() {
        let store = Arc::new(MemoryStore::new());
        let mut uploader = BatchUploader::new(store.clone(), small_batches(), fast_retry());

        for n in 0..4 {
            uploader.accumulate(test_unit(n)).await.unwrap();
        }
        uploader.flush().await.unwrap();

        assert_eq!(store.batch_count(), 2);
        for batch in store.batches() {
            assert_eq!(batch.len(), 2);
        }
        assert_eq!(store.unit_count(), 4);
    }

    #[tokio::test]
    async fn test_flush_submits_partial_batch() {
        let store = Arc::new(MemoryStore::new());
        let config = BatchConfig {
            batch_size: 10,
            ..small_batches()
        };
        let mut uploader = BatchUploader::new(store.clone(), config, fast_retry());

        for n in 0..3 {
            uploader.accumulate(test_unit(n)).await.unwrap();
        }
        assert_eq!(store.batch_count(), 0);

        uploader.flush().await.unwrap();
        assert_eq!(store.batch_count(), 1);
        assert_eq!(store.unit_count(), 3);
    }

    #[tokio::test]
    async fn test_consistency_level_tag_reaches_store() {
        let store = Arc::new(MemoryStore::new());
        let config = BatchConfig {
            consistency: ConsistencyLevel::All,
            ..small_batches()
        };
        let mut uploader = BatchUploader::new(store.clone(), config, fast_retry());

        uploader.accumulate(test_unit(1)).await.unwrap();
        uploader.flush().await.unwrap();
        assert_eq!(store.last_consistency(), Some(ConsistencyLevel::All));
    }

    #[tokio::test]
    async fn test_connection_failures_retry_until_success() {
        let store = Arc::new(MemoryStore::new());
        store.fail_next(StoreError::Connection("refused".to_string()));
        store.fail_next(StoreError::Connection("refused".to_string()));
        let mut uploader = BatchUploader::new(store.clone(), small_batches(), fast_retry());

        uploader.accumulate(test_unit(1)).await.unwrap();
        uploader.flush().await.unwrap();

        // The batch landed exactly once after the scripted failures.
        assert_eq!(store.batch_count(), 1);
        assert_eq!(store.unit_count(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_propagate_from_flush() {
        let store = Arc::new(MemoryStore::new());
        for _ in 0..4 {
            store.fail_next(StoreError::Timeout("slow".to_string()));
        }
        let mut uploader = BatchUploader::new(store.clone(), small_batches(), fast_retry());

        uploader.accumulate(test_unit(1)).await.unwrap();
        let err = uploader.flush().await.unwrap_err();
        match err {
            UploadError::BatchFailed {
                batch_len,
                attempts,
                source: StoreError::Timeout(_),
            } => {
                assert_eq!(batch_len, 1);
                // Initial attempt plus the three budgeted retries.
                assert_eq!(attempts, 4);
            }
            other => panic!("expected BatchFailed, got {other:?}"),
        }
        assert_eq!(store.batch_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_batch_fails_without_retry() {
        let store = Arc::new(MemoryStore::new());
        store.fail_next(StoreError::Rejected("invalid vector length".to_string()));
        let mut uploader = BatchUploader::new(store.clone(), small_batches(), fast_retry());

        uploader.accumulate(test_unit(1)).await.unwrap();
        let err = uploader.flush().await.unwrap_err();
        match err {
            UploadError::BatchFailed { attempts, .. } => assert_eq!(attempts, 1),
            other => panic!("expected BatchFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_flush_times_out_instead_of_hanging() {
        let store = Arc::new(MemoryStore::new().with_delay(Duration::from_millis(500)));
        let config = BatchConfig {
            await_termination: Duration::from_millis(20),
            ..small_batches()
        };
        let mut uploader = BatchUploader::new(store, config, fast_retry());

        uploader.accumulate(test_unit(1)).await.unwrap();
        let err = uploader.flush().await.unwrap_err();
        assert!(matches!(err, UploadError::FlushTimeout { timeout_ms: 20 }));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let mut uploader = BatchUploader::new(store.clone(), small_batches(), fast_retry());

        uploader.accumulate(test_unit(1)).await.unwrap();
        uploader.close().await.unwrap();
        assert_eq!(store.unit_count(), 1);

        // Closing again is a structural no-op, not an error.
        uploader.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_accumulate_after_close_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut uploader = BatchUploader::new(store, small_batches(), fast_retry());

        uploader.close().await.unwrap();
        let err = uploader.accumulate(test_unit(1)).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_flush_before_first_accumulate_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let mut uploader = BatchUploader::new(store.clone(), small_batches(), fast_retry());
        uploader.flush().await.unwrap();
        assert_eq!(store.batch_count(), 0);
    }
}

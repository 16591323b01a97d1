//! Error types for the store boundary and the batch uploader.

use thiserror::Error;

/// Errors surfaced by a [`crate::VectorStore`] implementation.
///
/// The split matters to the uploader: connection failures and timeouts
/// retry against their own budgets, a rejected batch fails immediately.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection failure: {0}")]
    Connection(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("batch rejected by store: {0}")]
    Rejected(String),
}

/// Errors surfaced by the batch uploader.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("cannot {op} a {state} uploader")]
    InvalidState {
        op: &'static str,
        state: &'static str,
    },

    #[error("batch of {batch_len} units failed after {attempts} attempt(s): {source}")]
    BatchFailed {
        batch_len: usize,
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("flush did not complete within {timeout_ms}ms")]
    FlushTimeout { timeout_ms: u64 },

    #[error("upload task failed: {0}")]
    Internal(String),
}

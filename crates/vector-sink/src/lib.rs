//! Store boundary and batched upload pipeline for vector-connect.
//!
//! This crate owns everything between "a record has been converted" and
//! "the remote store acknowledged it":
//!
//! - [`VectorStore`] - the opaque batched-write client boundary
//! - [`UploadUnit`] - one converted record ready for upload
//! - [`BatchUploader`] - accumulation, size-bounded batches, pool-bounded
//!   concurrent submission, bounded retry, and the flush/close lifecycle
//! - [`RetryPolicy`] / [`BatchConfig`] / [`StoreConfig`] - the immutable
//!   configuration handed in at pipeline start
//!
//! The remote store's wire protocol lives behind [`VectorStore`]; this
//! crate ships an in-memory implementation for tests in [`testing`].

pub mod config;
pub mod error;
pub mod testing;
pub mod traits;
pub mod uploader;

pub use config::{BatchConfig, ConsistencyLevel, RetryPolicy, StoreAuth, StoreConfig};
pub use error::{StoreError, UploadError};
pub use traits::{UploadUnit, VectorStore};
pub use uploader::BatchUploader;

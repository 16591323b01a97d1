//! Connector configuration.
//!
//! Every recognized option lives on [`SinkConfig`], parsed by clap and
//! validated exactly once at startup. Validation is the only source of
//! [`ConfigError`]: a pipeline that failed validation never becomes
//! active, and a pipeline that passed never re-reads its configuration.

use crate::strategy::{IdStrategyKind, VectorStrategyKind};
use clap::Parser;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use vector_sink::{BatchConfig, ConsistencyLevel, RetryPolicy, StoreAuth, StoreConfig};

/// Errors raised by configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid header '{0}', expected key=value")]
    InvalidHeader(String),

    #[error("invalid connection url '{0}', expected scheme://host:port")]
    InvalidConnectionUrl(String),

    #[error("auth scheme '{scheme}' requires {option} to be set")]
    MissingCredential {
        scheme: &'static str,
        option: &'static str,
    },

    #[error("{option} must be greater than zero")]
    InvalidSize { option: &'static str },

    #[error("enabling deletes requires the record-key document id strategy")]
    DeleteRequiresRecordKey,
}

/// Authentication mechanism selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AuthMechanism {
    /// Anonymous access
    None,
    /// Static API key
    ApiKey,
    /// OAuth client-credentials flow
    OidcClientCredentials,
}

/// Configuration for the sink connector.
#[derive(Debug, Clone, Parser)]
pub struct SinkConfig {
    /// Store connection URL
    #[clap(long, default_value = "http://localhost:8080")]
    pub connection_url: String,

    /// Secondary high-throughput channel URL
    #[clap(long)]
    pub grpc_url: Option<String>,

    /// Whether the secondary channel uses TLS
    #[clap(long)]
    pub grpc_secured: bool,

    /// Authentication mechanism to use against the store
    #[clap(long, value_enum, default_value_t = AuthMechanism::None)]
    pub auth_mechanism: AuthMechanism,

    /// API key (required with --auth-mechanism api-key)
    #[clap(long)]
    pub api_key: Option<String>,

    /// OIDC client secret (required with --auth-mechanism oidc-client-credentials)
    #[clap(long)]
    pub oidc_client_secret: Option<String>,

    /// OIDC client scopes
    #[clap(long, value_delimiter = ',', default_value = "openid")]
    pub oidc_scopes: Vec<String>,

    /// Mapping between topic and collection name, e.g. "Docs_${topic}"
    #[clap(long, default_value = "${topic}")]
    pub collection_mapping: String,

    /// Additional transport header as key=value (repeatable)
    #[clap(long = "header")]
    pub headers: Vec<String>,

    /// Strategy deriving the document id for each record
    #[clap(long, value_enum, default_value_t = IdStrategyKind::None)]
    pub document_id_strategy: IdStrategyKind,

    /// Field holding the document id (field strategy only)
    #[clap(long, default_value = "id")]
    pub document_id_field: String,

    /// Strategy deriving the embedding vector for each record
    #[clap(long, value_enum, default_value_t = VectorStrategyKind::None)]
    pub vector_strategy: VectorStrategyKind,

    /// Field holding the embedding vector (field strategy only)
    #[clap(long, default_value = "vector")]
    pub vector_field: String,

    /// Consistency level to write objects at
    #[clap(long, default_value = "quorum")]
    pub consistency_level: ConsistencyLevel,

    /// Number of records per batch
    #[clap(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Number of concurrently in-flight batches
    #[clap(long, default_value_t = 1)]
    pub pool_size: usize,

    /// How long a flush may block, in milliseconds
    #[clap(long, default_value_t = 10_000)]
    pub await_termination_ms: u64,

    /// Maximum retries after a connection failure
    #[clap(long, default_value_t = 3)]
    pub max_connection_retries: u32,

    /// Maximum retries after a timeout
    #[clap(long, default_value_t = 3)]
    pub max_timeout_retries: u32,

    /// Delay between retries, in milliseconds
    #[clap(long, default_value_t = 2_000)]
    pub retry_interval_ms: u64,

    /// Treat null record values as deletes (record-key id strategy only)
    #[clap(long)]
    pub delete_enabled: bool,
}

impl SinkConfig {
    /// Parse the configured transport headers.
    pub fn parsed_headers(&self) -> Result<HashMap<String, String>, ConfigError> {
        let mut headers = HashMap::with_capacity(self.headers.len());
        for header in &self.headers {
            let (key, value) = header
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidHeader(header.clone()))?;
            headers.insert(key.to_string(), value.to_string());
        }
        Ok(headers)
    }

    /// Materialize the store client configuration.
    pub fn store_config(&self) -> Result<StoreConfig, ConfigError> {
        if !self.connection_url.contains("://") {
            return Err(ConfigError::InvalidConnectionUrl(
                self.connection_url.clone(),
            ));
        }
        let auth = match self.auth_mechanism {
            AuthMechanism::None => StoreAuth::None,
            AuthMechanism::ApiKey => StoreAuth::ApiKey {
                key: self
                    .api_key
                    .clone()
                    .ok_or(ConfigError::MissingCredential {
                        scheme: "api-key",
                        option: "--api-key",
                    })?,
            },
            AuthMechanism::OidcClientCredentials => StoreAuth::OidcClientCredentials {
                client_secret: self.oidc_client_secret.clone().ok_or(
                    ConfigError::MissingCredential {
                        scheme: "oidc-client-credentials",
                        option: "--oidc-client-secret",
                    },
                )?,
                scopes: self.oidc_scopes.clone(),
            },
        };
        Ok(StoreConfig {
            endpoint: self.connection_url.clone(),
            headers: self.parsed_headers()?,
            grpc_endpoint: self.grpc_url.clone(),
            grpc_secured: self.grpc_secured,
            auth,
        })
    }

    /// Materialize the retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_connection_retries: self.max_connection_retries,
            max_timeout_retries: self.max_timeout_retries,
            retry_interval: Duration::from_millis(self.retry_interval_ms),
        }
    }

    /// Materialize the batch configuration.
    pub fn batch_config(&self) -> Result<BatchConfig, ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidSize {
                option: "--batch-size",
            });
        }
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidSize {
                option: "--pool-size",
            });
        }
        Ok(BatchConfig {
            batch_size: self.batch_size,
            pool_size: self.pool_size,
            await_termination: Duration::from_millis(self.await_termination_ms),
            consistency: self.consistency_level,
        })
    }

    /// Validate the whole configuration.
    ///
    /// Runs every materialization plus the cross-option rules, so that no
    /// record is ever processed under a configuration that would fail
    /// later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store_config()?;
        self.batch_config()?;
        if self.delete_enabled && self.document_id_strategy != IdStrategyKind::RecordKey {
            return Err(ConfigError::DeleteRequiresRecordKey);
        }
        Ok(())
    }
}

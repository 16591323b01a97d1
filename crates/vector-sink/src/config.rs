//! Configuration types for the store client and the batch uploader.
//!
//! All of these are constructed once at pipeline start, validated by the
//! connector configuration layer, and never mutated afterwards.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Per-write durability acknowledgment requirement passed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyLevel {
    /// All replicas must acknowledge
    All,
    /// A single replica acknowledgment suffices
    One,
    /// A majority of replicas must acknowledge
    #[default]
    Quorum,
}

impl ConsistencyLevel {
    /// Canonical tag sent to the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::One => "ONE",
            Self::Quorum => "QUORUM",
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsistencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "ONE" => Ok(Self::One),
            "QUORUM" => Ok(Self::Quorum),
            other => Err(format!(
                "invalid consistency level '{other}', expected one of: all, one, quorum"
            )),
        }
    }
}

/// Retry budgets supplied to batch submission.
///
/// Connection failures and timeouts are counted separately; the delay
/// between attempts is fixed, not backed off.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retries after a connection failure
    pub max_connection_retries: u32,
    /// Maximum retries after a timeout
    pub max_timeout_retries: u32,
    /// Fixed delay between attempts
    pub retry_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_connection_retries: 3,
            max_timeout_retries: 3,
            retry_interval: Duration::from_millis(2_000),
        }
    }
}

/// Sizing and lifecycle parameters for the batch uploader.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of upload units per batch
    pub batch_size: usize,
    /// Maximum concurrently in-flight batches
    pub pool_size: usize,
    /// How long flush and close may block before failing
    pub await_termination: Duration,
    /// Consistency tag applied to every write
    pub consistency: ConsistencyLevel,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            pool_size: 1,
            await_termination: Duration::from_millis(10_000),
            consistency: ConsistencyLevel::default(),
        }
    }
}

/// Authentication credentials for the store client.
#[derive(Debug, Clone)]
pub enum StoreAuth {
    /// Anonymous access
    None,
    /// Static API key
    ApiKey { key: String },
    /// OAuth client-credentials flow
    OidcClientCredentials {
        client_secret: String,
        scopes: Vec<String>,
    },
}

/// Connection parameters a store client implementation is constructed
/// from.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Primary endpoint, `scheme://host:port`
    pub endpoint: String,
    /// Additional transport headers
    pub headers: HashMap<String, String>,
    /// Optional secondary high-throughput channel endpoint
    pub grpc_endpoint: Option<String>,
    /// Whether the secondary channel uses TLS
    pub grpc_secured: bool,
    /// Authentication credentials
    pub auth: StoreAuth,
}

impl StoreConfig {
    /// Scheme part of the endpoint, if it has one.
    pub fn scheme(&self) -> Option<&str> {
        self.endpoint.split_once("://").map(|(scheme, _)| scheme)
    }

    /// Host-and-port part of the endpoint, if it has one.
    pub fn host_and_port(&self) -> Option<&str> {
        self.endpoint.split_once("://").map(|(_, rest)| rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_level_parses_case_insensitively() {
        assert_eq!(
            "quorum".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::Quorum
        );
        assert_eq!(
            "ALL".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::All
        );
        assert_eq!(
            "One".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::One
        );
        assert!("most".parse::<ConsistencyLevel>().is_err());
    }

    #[test]
    fn test_endpoint_split() {
        let config = StoreConfig {
            endpoint: "http://localhost:8080".to_string(),
            headers: HashMap::new(),
            grpc_endpoint: None,
            grpc_secured: false,
            auth: StoreAuth::None,
        };
        assert_eq!(config.scheme(), Some("http"));
        assert_eq!(config.host_and_port(), Some("localhost:8080"));
    }
}

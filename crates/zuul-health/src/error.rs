//! Error types for host configuration and probing.

use std::time::Duration;

use thiserror::Error;

/// Boxed error source carried by [`ProbeError::Request`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("zuul.listen-address-list must be specified to collect metrics")]
    EmptyAddressList,

    #[error("bad zuul listen address {address:?}: {reason}")]
    BadAddress { address: String, reason: &'static str },

    #[error("bad telemetry path {path:?}: {reason}")]
    TelemetryPath { path: String, reason: &'static str },

    #[error("invalid duration: {0:?}")]
    Duration(String),
}

/// A failure to reach a host. Recovered locally by the collector.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe uri {uri}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: http::Error,
    },

    #[error("request to {uri} failed: {source}")]
    Request {
        uri: String,
        #[source]
        source: BoxError,
    },

    #[error("request to {uri} timed out after {after:?}")]
    Timeout { uri: String, after: Duration },
}

impl ConfigError {
    pub(crate) fn bad_address(address: &str, reason: &'static str) -> Self {
        Self::BadAddress {
            address: address.to_string(),
            reason,
        }
    }
}

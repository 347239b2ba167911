//! Status endpoint probes.
//!
//! A probe issues `GET http://{host}:{port}/status` and reports whether
//! the host answered at all. The status code and body are not inspected.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Empty;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::error::{ConfigError, ProbeError};
use crate::host::Host;

const USER_AGENT: &str = concat!("zuul-exporter/", env!("CARGO_PKG_VERSION"));

/// Reachability check for a single host.
///
/// `Ok(())` means the host answered with some HTTP response.
pub trait Probe: Send + Sync {
    fn probe(&self, host: &Host) -> impl Future<Output = Result<(), ProbeError>> + Send;
}

/// HTTP probe backed by one pooled client shared across all hosts.
#[derive(Clone)]
pub struct HttpProbe {
    client: Client<HttpConnector, Empty<Bytes>>,
    timeout: Option<Duration>,
}

impl HttpProbe {
    /// A probe with no request timeout.
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            timeout: None,
        }
    }

    /// Bound every probe to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn get(&self, uri: &str) -> Result<(), ProbeError> {
        let req = http::Request::builder()
            .method("GET")
            .uri(uri)
            .header("user-agent", USER_AGENT)
            .body(Empty::<Bytes>::new())
            .map_err(|source| ProbeError::InvalidUri {
                uri: uri.to_string(),
                source,
            })?;

        let resp = self
            .client
            .request(req)
            .await
            .map_err(|e| ProbeError::Request {
                uri: uri.to_string(),
                source: Box::new(e),
            })?;

        debug!(status = %resp.status(), %uri, "zuul status probe answered");
        Ok(())
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for HttpProbe {
    async fn probe(&self, host: &Host) -> Result<(), ProbeError> {
        let uri = host.status_uri();
        match self.timeout {
            Some(after) => {
                let result = tokio::time::timeout(after, self.get(&uri)).await;
                match result {
                    Ok(probed) => probed,
                    Err(_) => Err(ProbeError::Timeout { uri, after }),
                }
            }
            None => self.get(&uri).await,
        }
    }
}

/// Parse a probe timeout like "5s", "500ms", "1m" or a bare number of
/// seconds. Values that overflow are rejected.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let number = |digits: &str| digits.parse::<u64>().ok();

    let parsed = match (s.strip_suffix("ms"), s.strip_suffix('s'), s.strip_suffix('m')) {
        (Some(ms), _, _) => number(ms).map(Duration::from_millis),
        (None, Some(secs), _) => number(secs).map(Duration::from_secs),
        (None, None, Some(mins)) => number(mins)
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs),
        (None, None, None) => number(s).map(Duration::from_secs),
    };
    parsed.ok_or_else(|| ConfigError::Duration(s.to_string()))
}

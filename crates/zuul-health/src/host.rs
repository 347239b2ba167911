//! Zuul host list parsing.
//!
//! The exporter is configured with a comma-separated list of `host:port`
//! tokens. Each token is split on its last `:`; IPv6 literals must be
//! bracketed (`[::1]:8001`).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A single zuul scheduler endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    hostname: String,
    port: u16,
}

impl Host {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }

    /// Hostname without brackets. Used as the `host` label value.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` suitable for a URI authority.
    pub fn authority(&self) -> String {
        if self.hostname.contains(':') {
            format!("[{}]:{}", self.hostname, self.port)
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }

    /// The status endpoint probed on every scrape.
    pub fn status_uri(&self) -> String {
        format!("http://{}/status", self.authority())
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority())
    }
}

impl FromStr for Host {
    type Err = ConfigError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let Some((host, port)) = token.rsplit_once(':') else {
            return Err(ConfigError::bad_address(token, "missing port"));
        };

        let hostname = match host.strip_prefix('[') {
            Some(inner) => inner
                .strip_suffix(']')
                .ok_or_else(|| ConfigError::bad_address(token, "missing ']' in address"))?,
            None if host.contains(':') => {
                return Err(ConfigError::bad_address(token, "too many colons in address"));
            }
            None => host,
        };

        if hostname.is_empty() {
            return Err(ConfigError::bad_address(token, "missing host"));
        }
        if port.is_empty() {
            return Err(ConfigError::bad_address(token, "missing port"));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| ConfigError::bad_address(token, "invalid port"))?;

        Ok(Host::new(hostname, port))
    }
}

/// The ordered, immutable list of hosts scraped on every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSet {
    hosts: Vec<Host>,
}

impl HostSet {
    /// Parse a comma-separated `host:port` list, preserving input order.
    ///
    /// An empty list is an error: there is no default host. Hostnames must
    /// be unique because they are the only label on the reachability gauge.
    pub fn parse(address_list: &str) -> Result<Self, ConfigError> {
        if address_list.trim().is_empty() {
            return Err(ConfigError::EmptyAddressList);
        }

        let mut seen = HashSet::new();
        let mut hosts = Vec::new();
        for token in address_list.split(',') {
            let host: Host = token.parse()?;
            if !seen.insert(host.hostname.clone()) {
                return Err(ConfigError::bad_address(token.trim(), "duplicate host"));
            }
            hosts.push(host);
        }

        Ok(Self { hosts })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Host> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl<'a> IntoIterator for &'a HostSet {
    type Item = &'a Host;
    type IntoIter = std::slice::Iter<'a, Host>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.iter()
    }
}

impl fmt::Display for HostSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, host) in self.hosts.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{host}")?;
        }
        Ok(())
    }
}

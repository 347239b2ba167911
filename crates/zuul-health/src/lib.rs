//! zuul-health - reachability probing for zuul scheduler hosts.
//!
//! Parses the configured `host:port` list and probes each host's
//! `/status` endpoint over plain HTTP.
//!
//! # Architecture
//!
//! ```text
//! HostSet::parse("zuul1:8001,zuul2:8001")
//!   └── Vec<Host> (fixed for the process lifetime)
//!
//! Probe (trait)
//!   └── HttpProbe → GET http://{host}:{port}/status via a pooled client
//! ```
//!
//! Any HTTP response counts as reachable. Connection, DNS and timeout
//! failures all surface as a single [`ProbeError`].

pub mod error;
pub mod host;
pub mod probe;

pub use error::{ConfigError, ProbeError};
pub use host::{Host, HostSet};
pub use probe::{HttpProbe, Probe, parse_duration};

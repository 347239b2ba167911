//! zuul-metrics - the scrape side of the zuul exporter.
//!
//! Owns the per-host reachability gauges, the scrape failure counter and
//! the Prometheus text rendering of both.
//!
//! # Architecture
//!
//! ```text
//! Collector
//!   ├── describe() → metric descriptors, no I/O
//!   └── collect()  → one serialized scrape cycle over every host
//!         ├── zuul_up{host} per probed host
//!         └── zuul_exporter_scrape_failures_total on a failed cycle
//!
//! Prometheus exposition
//!   └── render_exposition() → text/plain for the telemetry endpoint
//! ```

pub mod build_info;
pub mod collector;
pub mod exposition;

pub use build_info::BuildInfo;
pub use collector::Collector;
pub use exposition::{CONTENT_TYPE, Desc, MetricKind, Sample, render_exposition};

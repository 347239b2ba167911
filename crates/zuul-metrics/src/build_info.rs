//! Exporter build information metric.

use crate::exposition::{Desc, MetricKind, Sample};

pub const BUILD_INFO: Desc = Desc {
    name: "zuul_exporter_build_info",
    help: "A metric with a constant '1' value labeled by the version of zuul_exporter.",
    kind: MetricKind::Gauge,
    labels: &["version"],
};

/// Constant `zuul_exporter_build_info` gauge.
#[derive(Debug, Clone)]
pub struct BuildInfo {
    version: String,
}

impl BuildInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Build info for this crate's version.
    pub fn current() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn describe(&self) -> Desc {
        BUILD_INFO
    }

    pub fn sample(&self) -> Sample {
        Sample::new(&BUILD_INFO, 1.0).with_label("version", self.version.clone())
    }
}

//! zuul-api - HTTP surface of the zuul exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | any | `{telemetry-path}` | Prometheus exposition, one scrape cycle per request |
//! | GET | any other path | HTML landing page linking to the telemetry path |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::any;
use zuul_health::{ConfigError, HttpProbe, Probe};
use zuul_metrics::{BuildInfo, Collector};

/// Shared state for exporter handlers.
pub struct ExporterState<P = HttpProbe> {
    pub collector: Arc<Collector<P>>,
    pub build_info: BuildInfo,
    pub telemetry_path: String,
}

impl<P> Clone for ExporterState<P> {
    fn clone(&self) -> Self {
        Self {
            collector: self.collector.clone(),
            build_info: self.build_info.clone(),
            telemetry_path: self.telemetry_path.clone(),
        }
    }
}

/// Build the exporter router.
///
/// The telemetry path answers any method. Every other path serves the
/// landing page.
pub fn build_router<P>(
    collector: Arc<Collector<P>>,
    telemetry_path: &str,
) -> Result<Router, ConfigError>
where
    P: Probe + 'static,
{
    check_telemetry_path(telemetry_path)?;

    let state = ExporterState {
        collector,
        build_info: BuildInfo::current(),
        telemetry_path: telemetry_path.to_string(),
    };

    Ok(Router::new()
        .route(telemetry_path, any(handlers::metrics::<P>))
        .fallback(handlers::landing_page::<P>)
        .with_state(state))
}

/// Reject telemetry paths the router would treat as captures or wildcards.
///
/// The path is matched literally, so it must be absolute and free of
/// `{`, `}`, and segments starting with `:` or `*`.
pub fn check_telemetry_path(path: &str) -> Result<(), ConfigError> {
    let bad = |reason| ConfigError::TelemetryPath {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(bad("must start with '/'"));
    }
    if path.contains(['{', '}']) {
        return Err(bad("must not contain '{' or '}'"));
    }
    if path.split('/').any(|segment| segment.starts_with([':', '*'])) {
        return Err(bad("segments must not start with ':' or '*'"));
    }
    Ok(())
}

//! Exporter route handlers.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use tracing::debug;

use zuul_health::Probe;
use zuul_metrics::{CONTENT_TYPE, render_exposition};

use crate::ExporterState;

/// {telemetry-path}: run one scrape cycle and render it.
pub async fn metrics<P: Probe + 'static>(
    State(state): State<ExporterState<P>>,
) -> impl IntoResponse {
    let mut descs = state.collector.describe();
    descs.push(state.build_info.describe());

    let mut samples = state.collector.collect().await;
    samples.push(state.build_info.sample());
    debug!(samples = samples.len(), "scrape complete");

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        render_exposition(&descs, &samples),
    )
}

/// Landing page served for every path except the telemetry path.
pub async fn landing_page<P: Probe + 'static>(
    State(state): State<ExporterState<P>>,
) -> Html<String> {
    Html(format!(
        r#"<html>
<head><title>Zuul Exporter</title></head>
<body>
<h1>Zuul Exporter</h1>
<p><a href="{}">Metrics</a></p>
</body>
</html>
"#,
        state.telemetry_path
    ))
}

//! zuul_exporter - exposes zuul scheduler reachability to Prometheus.
//!
//! Probes `http://{host}:{port}/status` on every configured zuul host
//! each time the telemetry endpoint is scraped.
//!
//! # Usage
//!
//! ```text
//! zuul_exporter --zuul.listen-address-list zuul01:8001,zuul02:8001
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zuul_health::{HostSet, HttpProbe, parse_duration};
use zuul_metrics::Collector;

#[derive(Parser, Debug)]
#[command(name = "zuul_exporter", version, about = "Zuul -> Prometheus exporter")]
struct Cli {
    /// The address on which to expose the web interface and generated Prometheus metrics.
    #[arg(long = "web.listen-address", default_value = ":9532")]
    listen_address: String,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", default_value = "/metrics")]
    telemetry_path: String,

    /// Comma-separated zuul host:port list.
    #[arg(long = "zuul.listen-address-list", default_value = "")]
    zuul_address_list: String,

    /// Per-probe timeout such as "5s" or "500ms". No timeout when unset.
    #[arg(long = "zuul.probe-timeout")]
    probe_timeout: Option<String>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long = "log.level", default_value = "info")]
    log_level: String,

    #[arg(long = "log.format", value_enum, default_value_t = LogFormat::Logfmt)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Logfmt,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level, cli.log_format) {
        eprintln!("zuul_exporter: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Logfmt => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // ── Configuration ──────────────────────────────────────────

    let hosts = HostSet::parse(&cli.zuul_address_list)?;

    let mut probe = HttpProbe::new();
    if let Some(timeout) = cli.probe_timeout.as_deref() {
        probe = probe.with_timeout(parse_duration(timeout)?);
    }

    // ── Collector + router ─────────────────────────────────────

    let collector = Arc::new(Collector::with_probe(hosts, probe));

    info!(version = env!("CARGO_PKG_VERSION"), "starting zuul exporter");
    info!(addresses = %collector.hosts(), "accepting zuul addresses");

    let router = zuul_api::build_router(collector, &cli.telemetry_path)?;

    // ── Listener ───────────────────────────────────────────────

    let addr = listen_address(&cli.listen_address);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to listen on {addr}"))?;

    info!(%addr, path = %cli.telemetry_path, "accepting prometheus requests");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("zuul exporter stopped");
    Ok(())
}

/// Expand a bare `:port` to all IPv4 interfaces.
fn listen_address(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use zuul_health::ConfigError;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["zuul_exporter"]).unwrap();
        assert_eq!(cli.listen_address, ":9532");
        assert_eq!(cli.telemetry_path, "/metrics");
        assert_eq!(cli.zuul_address_list, "");
        assert_eq!(cli.probe_timeout, None);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LogFormat::Logfmt);
    }

    #[test]
    fn cli_dotted_flags() {
        let cli = Cli::try_parse_from([
            "zuul_exporter",
            "--web.listen-address",
            "127.0.0.1:9000",
            "--web.telemetry-path=/zuul",
            "--zuul.listen-address-list",
            "zuul01:8001,zuul02:8001",
            "--zuul.probe-timeout",
            "5s",
            "--log.format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.listen_address, "127.0.0.1:9000");
        assert_eq!(cli.telemetry_path, "/zuul");
        assert_eq!(cli.zuul_address_list, "zuul01:8001,zuul02:8001");
        assert_eq!(cli.probe_timeout.as_deref(), Some("5s"));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn listen_address_expands_bare_port() {
        assert_eq!(listen_address(":9532"), "0.0.0.0:9532");
        assert_eq!(listen_address("127.0.0.1:9532"), "127.0.0.1:9532");
    }

    #[tokio::test]
    async fn run_rejects_empty_address_list() {
        let cli = Cli::try_parse_from(["zuul_exporter"]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::EmptyAddressList)
        ));
    }

    #[tokio::test]
    async fn run_rejects_malformed_host() {
        let cli =
            Cli::try_parse_from(["zuul_exporter", "--zuul.listen-address-list", "zuul01"]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::BadAddress { .. })
        ));
    }

    #[tokio::test]
    async fn run_rejects_relative_telemetry_path() {
        let cli = Cli::try_parse_from([
            "zuul_exporter",
            "--zuul.listen-address-list",
            "zuul01:8001",
            "--web.telemetry-path",
            "metrics",
        ])
        .unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::TelemetryPath { .. })
        ));
    }

    #[tokio::test]
    async fn run_rejects_route_syntax_in_telemetry_path() {
        for path in ["/:metrics", "/metrics/{id}", "/metrics/*rest"] {
            let cli = Cli::try_parse_from([
                "zuul_exporter",
                "--zuul.listen-address-list",
                "zuul01:8001",
                "--web.telemetry-path",
                path,
            ])
            .unwrap();
            let err = run(cli).await.unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<ConfigError>(),
                    Some(ConfigError::TelemetryPath { .. })
                ),
                "{path}: {err:#}"
            );
        }
    }

    #[tokio::test]
    async fn run_rejects_overflowing_probe_timeout() {
        let cli = Cli::try_parse_from([
            "zuul_exporter",
            "--zuul.listen-address-list",
            "zuul01:8001",
            "--zuul.probe-timeout",
            "307445734561825861m",
        ])
        .unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Duration(_))
        ));
    }

    #[tokio::test]
    async fn run_fails_when_port_is_taken() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();
        let cli = Cli::try_parse_from([
            "zuul_exporter",
            "--zuul.listen-address-list",
            "zuul01:8001",
            "--web.listen-address",
            &addr,
        ])
        .unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(err.to_string().contains("failed to listen on"), "{err:#}");
    }
}

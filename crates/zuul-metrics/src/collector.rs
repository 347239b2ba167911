//! Scrape collector: probes every zuul host on each scrape request.
//!
//! Scrapes are serialized behind a single lock held for the whole cycle,
//! so concurrent scrape requests queue instead of overlapping. A cycle
//! stops at the first unreachable host: that host is reported as down,
//! the hosts after it are not probed, and the failure counter is bumped.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, error};

use zuul_health::{Host, HostSet, HttpProbe, Probe, ProbeError};

use crate::exposition::{Desc, MetricKind, Sample};

pub const UP: Desc = Desc {
    name: "zuul_up",
    help: "Could the zuul server be reached",
    kind: MetricKind::Gauge,
    labels: &["host"],
};

pub const SCRAPE_FAILURES: Desc = Desc {
    name: "zuul_exporter_scrape_failures_total",
    help: "Number of errors while scraping zuul.",
    kind: MetricKind::Counter,
    labels: &[],
};

/// Declared for the zuul server version. No sample is produced for it
/// because the `/status` body is never read.
pub const VERSION: Desc = Desc {
    name: "zuul_version",
    help: "The version of zuul server",
    kind: MetricKind::Gauge,
    labels: &[],
};

/// Probes a fixed list of zuul hosts and turns the results into samples.
pub struct Collector<P = HttpProbe> {
    /// Hosts in configuration order. Never changes after construction.
    hosts: HostSet,
    probe: P,
    /// Cycles that hit at least one unreachable host.
    scrape_failures: AtomicU64,
    /// Held for the duration of one scrape cycle.
    cycle: Mutex<()>,
}

impl Collector<HttpProbe> {
    /// Create a collector using a shared HTTP client with no timeout.
    pub fn new(hosts: HostSet) -> Self {
        Self::with_probe(hosts, HttpProbe::new())
    }
}

impl<P: Probe> Collector<P> {
    pub fn with_probe(hosts: HostSet, probe: P) -> Self {
        Self {
            hosts,
            probe,
            scrape_failures: AtomicU64::new(0),
            cycle: Mutex::new(()),
        }
    }

    pub fn hosts(&self) -> &HostSet {
        &self.hosts
    }

    /// Total number of failed cycles so far.
    pub fn scrape_failures(&self) -> u64 {
        self.scrape_failures.load(Ordering::Relaxed)
    }

    /// Descriptors of every family this collector can emit.
    pub fn describe(&self) -> Vec<Desc> {
        vec![UP, SCRAPE_FAILURES, VERSION]
    }

    /// Run one scrape cycle and return its samples.
    ///
    /// Waits for any in-flight cycle to finish first. Probe failures never
    /// escape: they become a zero gauge, a counter sample and an error log.
    pub async fn collect(&self) -> Vec<Sample> {
        let _cycle = self.cycle.lock().await;

        let mut samples = Vec::with_capacity(self.hosts.len() + 1);
        if let Err(e) = self.probe_hosts(&mut samples).await {
            error!(error = %e, "error scraping zuul");
            let total = self.scrape_failures.fetch_add(1, Ordering::Relaxed) + 1;
            samples.push(Sample::new(&SCRAPE_FAILURES, total as f64));
        }
        samples
    }

    /// Probe hosts in order, stopping at the first failure.
    async fn probe_hosts(&self, samples: &mut Vec<Sample>) -> Result<(), ProbeError> {
        for host in &self.hosts {
            match self.probe.probe(host).await {
                Ok(()) => {
                    debug!(host = %host, "zuul host reachable");
                    samples.push(up(host, 1.0));
                }
                Err(e) => {
                    samples.push(up(host, 0.0));
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

fn up(host: &Host, value: f64) -> Sample {
    Sample::new(&UP, value).with_label("host", host.hostname())
}

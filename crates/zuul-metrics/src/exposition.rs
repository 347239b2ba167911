//! Prometheus text exposition format.
//!
//! Renders metric descriptors and the samples of one scrape into the
//! Prometheus text exposition format (version 0.0.4).

use std::fmt::Write;

/// Content type of the rendered exposition.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

/// Static description of a metric family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desc {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    /// Label names every sample of this family carries.
    pub labels: &'static [&'static str],
}

/// One value of a metric family, produced fresh on every scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Sample {
    pub fn new(desc: &Desc, value: f64) -> Self {
        Self {
            name: desc.name,
            labels: Vec::new(),
            value,
        }
    }

    pub fn with_label(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.labels.push((name, value.into()));
        self
    }

    /// Value of the label `name`, if present.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Render every described family with its samples.
///
/// Families appear in `descs` order and always get `# HELP` and `# TYPE`
/// lines, even with no samples this scrape.
pub fn render_exposition(descs: &[Desc], samples: &[Sample]) -> String {
    let mut out = String::new();

    for desc in descs {
        let _ = writeln!(out, "# HELP {} {}", desc.name, escape_help(desc.help));
        let _ = writeln!(out, "# TYPE {} {}", desc.name, desc.kind.as_str());

        for s in samples.iter().filter(|s| s.name == desc.name) {
            out.push_str(s.name);
            if !s.labels.is_empty() {
                out.push('{');
                for (i, (k, v)) in s.labels.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{k}=\"{}\"", escape_label_value(v));
                }
                out.push('}');
            }
            let _ = writeln!(out, " {}", s.value);
        }
    }

    out
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP: Desc = Desc {
        name: "test_up",
        help: "Whether the target is up.",
        kind: MetricKind::Gauge,
        labels: &["host"],
    };

    const FAILURES: Desc = Desc {
        name: "test_failures_total",
        help: "Failed scrapes.",
        kind: MetricKind::Counter,
        labels: &[],
    };

    #[test]
    fn render_empty() {
        let output = render_exposition(&[UP, FAILURES], &[]);
        // Should still have type declarations.
        assert!(output.contains("# HELP test_up Whether the target is up.\n"));
        assert!(output.contains("# TYPE test_up gauge\n"));
        assert!(output.contains("# TYPE test_failures_total counter\n"));
    }

    #[test]
    fn render_labeled_gauges() {
        let samples = vec![
            Sample::new(&UP, 1.0).with_label("host", "zuul01"),
            Sample::new(&UP, 0.0).with_label("host", "zuul02"),
        ];
        let output = render_exposition(&[UP], &samples);

        assert!(output.contains("test_up{host=\"zuul01\"} 1\n"));
        assert!(output.contains("test_up{host=\"zuul02\"} 0\n"));
    }

    #[test]
    fn render_unlabeled_counter() {
        let samples = vec![Sample::new(&FAILURES, 3.0)];
        let output = render_exposition(&[FAILURES], &samples);
        assert!(output.contains("\ntest_failures_total 3\n"));
    }

    #[test]
    fn samples_follow_their_family_header() {
        let samples = vec![
            Sample::new(&FAILURES, 1.0),
            Sample::new(&UP, 1.0).with_label("host", "a"),
        ];
        let output = render_exposition(&[UP, FAILURES], &samples);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "# HELP test_up Whether the target is up.",
                "# TYPE test_up gauge",
                "test_up{host=\"a\"} 1",
                "# HELP test_failures_total Failed scrapes.",
                "# TYPE test_failures_total counter",
                "test_failures_total 1",
            ]
        );
    }

    #[test]
    fn samples_without_descriptor_are_dropped() {
        let stray = Sample::new(&FAILURES, 1.0);
        let output = render_exposition(&[UP], &[stray]);
        assert!(!output.contains("test_failures_total"));
    }

    #[test]
    fn label_values_are_escaped() {
        let samples = vec![Sample::new(&UP, 1.0).with_label("host", "a\"b\\c\nd")];
        let output = render_exposition(&[UP], &samples);
        assert!(output.contains(r#"test_up{host="a\"b\\c\nd"} 1"#));
    }

    #[test]
    fn sample_label_lookup() {
        let s = Sample::new(&UP, 1.0).with_label("host", "zuul01");
        assert_eq!(s.label("host"), Some("zuul01"));
        assert_eq!(s.label("port"), None);
    }
}

//! Human-readable rendering of [`Metrics`].

use core::fmt;

use super::Metrics;

/// Titled set of metrics that renders as a plain-text block.
#[derive(Debug, Clone)]
pub struct PerformanceReport {
    title: String,
    metrics: Metrics,
}

impl PerformanceReport {
    /// Creates a report titled `title`.
    #[must_use]
    pub fn new(title: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            title: title.into(),
            metrics,
        }
    }

    /// Report heading.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Figures the report renders.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Writes the report through the log facade at info level.
    pub fn log(&self) {
        ewe_logs::info!("{}", self);
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        writeln!(f, "Operations: {}", self.metrics.operations)?;
        writeln!(f, "Duration: {:?}", self.metrics.duration)?;
        writeln!(f, "Throughput: {:.2} ops/sec", self.metrics.throughput)?;

        if let Some(summary) = self.metrics.summary() {
            writeln!(f)?;
            writeln!(f, "Latency (ns):")?;
            writeln!(f, "  Min: {}", summary.min)?;
            writeln!(f, "  Avg: {:.0}", summary.mean)?;
            writeln!(f, "  Median: {}", summary.median)?;
            writeln!(f, "  P95: {}", summary.p95)?;
            writeln!(f, "  P99: {}", summary.p99)?;
            writeln!(f, "  Max: {}", summary.max)?;
        }

        Ok(())
    }
}

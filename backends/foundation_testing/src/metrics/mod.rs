//! Latency and throughput figures collected from stress runs and scenarios.

pub mod reporter;

pub use reporter::PerformanceReport;

use core::time::Duration;

/// Operation count, wall time and optional per-operation latencies.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Latency of each recorded operation, in nanoseconds.
    pub latencies: Vec<u64>,
    /// Operations per second over [`Metrics::duration`].
    pub throughput: f64,
    /// Operations completed.
    pub operations: usize,
    /// Wall time of the run.
    pub duration: Duration,
}

impl Metrics {
    /// Metrics for `operations` completed in `duration`, without latencies.
    #[must_use]
    pub const fn new(operations: usize, duration: Duration) -> Self {
        Self {
            latencies: Vec::new(),
            throughput: 0.0,
            operations,
            duration,
        }
    }

    /// Fills in [`Metrics::throughput`] from the operation count and duration.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn with_throughput(mut self) -> Self {
        let secs = self.duration.as_secs_f64();
        self.throughput = if secs > 0.0 {
            self.operations as f64 / secs
        } else {
            0.0
        };
        self
    }

    /// Attaches per-operation latencies in nanoseconds.
    #[must_use]
    pub fn with_latencies(mut self, latencies: Vec<u64>) -> Self {
        self.latencies = latencies;
        self
    }

    /// Fastest recorded operation.
    #[must_use]
    pub fn min_latency(&self) -> Option<u64> {
        self.latencies.iter().min().copied()
    }

    /// Slowest recorded operation.
    #[must_use]
    pub fn max_latency(&self) -> Option<u64> {
        self.latencies.iter().max().copied()
    }

    /// Mean latency.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_latency(&self) -> Option<f64> {
        if self.latencies.is_empty() {
            return None;
        }
        let sum: u128 = self.latencies.iter().map(|&l| u128::from(l)).sum();
        Some(sum as f64 / self.latencies.len() as f64)
    }

    /// 50th percentile latency.
    #[must_use]
    pub fn median_latency(&self) -> Option<u64> {
        self.percentile_latency(0.5)
    }

    /// 95th percentile latency.
    #[must_use]
    pub fn p95_latency(&self) -> Option<u64> {
        self.percentile_latency(0.95)
    }

    /// 99th percentile latency.
    #[must_use]
    pub fn p99_latency(&self) -> Option<u64> {
        self.percentile_latency(0.99)
    }

    /// Nearest-rank latency at `percentile` (0.0 to 1.0).
    #[must_use]
    pub fn percentile_latency(&self, percentile: f64) -> Option<u64> {
        let sorted = self.sorted_latencies();
        nearest_rank(&sorted, percentile)
    }

    /// Percentile summary computed from a single sort.
    #[must_use]
    pub fn summary(&self) -> Option<LatencySummary> {
        let sorted = self.sorted_latencies();
        Some(LatencySummary {
            min: *sorted.first()?,
            median: nearest_rank(&sorted, 0.5)?,
            p95: nearest_rank(&sorted, 0.95)?,
            p99: nearest_rank(&sorted, 0.99)?,
            max: *sorted.last()?,
            mean: self.avg_latency()?,
        })
    }

    /// Folds another run into this one. Durations add up.
    pub fn merge(&mut self, other: Metrics) {
        self.operations += other.operations;
        self.duration += other.duration;
        self.latencies.extend(other.latencies);
        let secs = self.duration.as_secs_f64();
        #[allow(clippy::cast_precision_loss)]
        let throughput = if secs > 0.0 {
            self.operations as f64 / secs
        } else {
            0.0
        };
        self.throughput = throughput;
    }

    fn sorted_latencies(&self) -> Vec<u64> {
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted
    }
}

/// Latency distribution of a run, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    /// Fastest operation.
    pub min: u64,
    /// 50th percentile.
    pub median: u64,
    /// 95th percentile.
    pub p95: u64,
    /// 99th percentile.
    pub p99: u64,
    /// Slowest operation.
    pub max: u64,
    /// Arithmetic mean.
    pub mean: f64,
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn nearest_rank(sorted: &[u64], percentile: f64) -> Option<u64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&percentile) {
        return None;
    }
    let rank = ((sorted.len() as f64) * percentile).ceil() as usize;
    Some(sorted[rank.saturating_sub(1).min(sorted.len() - 1)])
}

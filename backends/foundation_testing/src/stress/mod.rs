//! Stress test framework for the coordination primitives.
//!
//! Provides configurable high-contention testing with:
//! - Thread count control
//! - Iteration limits
//! - Time-based duration
//! - Success rate tracking
//! - Optional per-operation latency capture

use core::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::metrics::Metrics;

pub mod config;
pub mod sync;

pub use config::StressConfig;

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressResult {
    /// Total operations completed successfully
    pub successes: usize,
    /// Total operations that failed
    pub failures: usize,
    /// Total time taken for the test
    pub duration: Duration,
    /// Number of threads used
    pub thread_count: usize,
    /// Worker threads that panicked instead of finishing
    pub panicked: usize,
}

impl StressResult {
    /// Creates a new stress test result.
    #[must_use]
    pub const fn new(
        successes: usize,
        failures: usize,
        duration: Duration,
        thread_count: usize,
    ) -> Self {
        Self {
            successes,
            failures,
            duration,
            thread_count,
            panicked: 0,
        }
    }

    /// Returns the total number of operations.
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.successes + self.failures
    }

    /// Returns the success rate as a value between 0.0 and 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_operations() == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_operations() as f64
        }
    }

    /// Returns operations per second.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn operations_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total_operations() as f64 / secs
        }
    }

    /// True if every operation succeeded and no worker panicked.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures == 0 && self.panicked == 0
    }
}

/// Base stress test harness.
///
/// Spawns multiple threads that execute a closure repeatedly
/// until the test completes (based on iteration count or duration).
pub struct StressHarness {
    config: StressConfig,
}

impl StressHarness {
    /// Creates a new stress test harness with the given configuration.
    #[must_use]
    pub const fn new(config: StressConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this harness runs with.
    #[must_use]
    pub const fn config(&self) -> &StressConfig {
        &self.config
    }

    /// Runs a stress test with the given operation closure.
    ///
    /// The closure receives:
    /// - `thread_id`: Index of the thread (`0..thread_count`)
    /// - `iteration`: Iteration number for this thread
    ///
    /// Returns `true` on success, `false` on failure. A panicking worker is
    /// counted in [`StressResult::panicked`] rather than propagated.
    ///
    /// # Examples
    ///
    /// ```
    /// use foundation_testing::stress::{StressConfig, StressHarness};
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let counter = Arc::new(AtomicUsize::new(0));
    /// let config = StressConfig::new().threads(4).iterations(100);
    /// let harness = StressHarness::new(config);
    ///
    /// let counter_clone = Arc::clone(&counter);
    /// let result = harness.run(move |_thread_id, _iteration| {
    ///     counter_clone.fetch_add(1, Ordering::Relaxed);
    ///     true
    /// });
    ///
    /// assert_eq!(counter.load(Ordering::Relaxed), 400); // 4 threads * 100 iterations
    /// assert_eq!(result.successes, 400);
    /// ```
    pub fn run<F>(self, operation: F) -> StressResult
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        self.execute(operation, false).0
    }

    /// Like [`Self::run`] but also records the latency of every operation.
    pub fn run_measured<F>(self, operation: F) -> (StressResult, Metrics)
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        let (result, latencies) = self.execute(operation, true);
        let metrics = Metrics::new(result.total_operations(), result.duration)
            .with_throughput()
            .with_latencies(latencies);
        (result, metrics)
    }

    fn execute<F>(self, operation: F, measure: bool) -> (StressResult, Vec<u64>)
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        let thread_count = self.config.get_thread_count();
        ewe_logs::info!(
            "stress run starting: {} threads x {} iterations",
            thread_count,
            self.config.get_iterations()
        );

        let start = Instant::now();
        let operation = Arc::new(operation);

        let successes = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        let stop_flag = Arc::new(AtomicBool::new(false));

        // Spawn timeout thread if duration is set
        if let Some(duration) = self.config.get_duration() {
            let stop_flag_clone = Arc::clone(&stop_flag);
            thread::spawn(move || {
                thread::sleep(duration);
                stop_flag_clone.store(true, Ordering::Release);
            });
        }

        let mut handles = Vec::with_capacity(thread_count);

        for thread_id in 0..thread_count {
            let operation = Arc::clone(&operation);
            let successes = Arc::clone(&successes);
            let failures = Arc::clone(&failures);
            let stop_flag = Arc::clone(&stop_flag);
            let iterations = self.config.get_iterations();

            handles.push(thread::spawn(move || {
                let mut latencies = Vec::with_capacity(if measure { iterations } else { 0 });

                for iteration in 0..iterations {
                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }

                    let op_start = Instant::now();
                    let ok = operation(thread_id, iteration);
                    if measure {
                        latencies.push(
                            u64::try_from(op_start.elapsed().as_nanos()).unwrap_or(u64::MAX),
                        );
                    }

                    if ok {
                        successes.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failures.fetch_add(1, Ordering::Relaxed);
                    }
                }

                latencies
            }));
        }

        let mut panicked = 0;
        let mut latencies = Vec::new();
        for handle in handles {
            match handle.join() {
                Ok(thread_latencies) => latencies.extend(thread_latencies),
                Err(_) => panicked += 1,
            }
        }

        let mut result = StressResult::new(
            successes.load(Ordering::Relaxed),
            failures.load(Ordering::Relaxed),
            start.elapsed(),
            thread_count,
        );
        result.panicked = panicked;

        if result.is_clean() {
            ewe_logs::info!(
                "stress run finished: {} ops in {:?}",
                result.total_operations(),
                result.duration
            );
        } else {
            ewe_logs::warn!(
                "stress run finished with {} failures and {} panicked workers",
                result.failures,
                result.panicked
            );
        }

        (result, latencies)
    }
}

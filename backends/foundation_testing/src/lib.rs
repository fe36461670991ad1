//! Reusable stress testing infrastructure for the `foundation_sync`
//! coordination primitives.
//!
//! This crate provides:
//! - **Stress test framework**: Configurable high-contention testing
//! - **Scenarios**: Producer/consumer pipelines, phased barrier rounds and
//!   semaphore-gated resource pools, each checking the invariants of the
//!   primitive it drives
//! - **Performance metrics**: Latency, throughput reports
//! - **Criterion benchmarks**: Queue hand-off and barrier round trips
//!
//! # Examples
//!
//! ```rust
//! use foundation_testing::scenarios::{run_pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new()
//!     .producers(3)
//!     .consumers(2)
//!     .items_per_producer(100)
//!     .capacity(4);
//!
//! let report = run_pipeline(config).unwrap();
//! assert_eq!(report.delivered, 300);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Common for testing crates

pub mod errors;
pub mod metrics;
pub mod scenarios;
pub mod stress;

// Re-export commonly used items
pub use errors::{ScenarioError, ScenarioResult};
pub use metrics::{LatencySummary, Metrics, PerformanceReport};
pub use stress::{StressConfig, StressHarness, StressResult};

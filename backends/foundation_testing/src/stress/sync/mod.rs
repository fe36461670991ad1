//! Stress drivers for the `foundation_sync` primitives.
//!
//! Every driver honours [`StressConfig::get_op_timeout`](crate::StressConfig::get_op_timeout):
//! with a bound, a blocking call that never returns counts as a failure
//! instead of hanging the run.

pub mod barrier;
pub mod queue;
pub mod semaphore;

pub use barrier::run_barrier_round_stress;
pub use queue::{run_queue_handoff_stress, run_queue_try_ops_stress};
pub use semaphore::run_semaphore_pool_stress;

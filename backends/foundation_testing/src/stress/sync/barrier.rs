//! `CyclicBarrier` stress tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use foundation_sync::CyclicBarrier;

use crate::stress::{StressConfig, StressHarness, StressResult};

/// Runs every thread through one barrier round per iteration.
///
/// The barrier has one party per thread, so iteration `n` of every thread
/// must complete generation `n`. An iteration also fails if the round it
/// completed saw anything but exactly one leader by the time the next
/// round ends.
///
/// Threads must run the same number of rounds, so do not combine this
/// with [`StressConfig::duration`]: a thread stopped early leaves the
/// others blocked until the op timeout breaks the barrier.
///
/// # Examples
///
/// ```
/// use foundation_testing::stress::{StressConfig, sync::run_barrier_round_stress};
///
/// let config = StressConfig::new().threads(4).iterations(200);
/// let result = run_barrier_round_stress(config);
///
/// assert!(result.is_clean());
/// ```
#[must_use]
pub fn run_barrier_round_stress(config: StressConfig) -> StressResult {
    let parties = config.get_thread_count().max(1);
    let barrier = CyclicBarrier::new(parties);
    let timeout = config.get_op_timeout();
    let leaders: Arc<Vec<AtomicUsize>> = Arc::new(
        (0..config.get_iterations())
            .map(|_| AtomicUsize::new(0))
            .collect(),
    );

    StressHarness::new(config).run(move |_thread_id, iteration| {
        let arrived = match timeout {
            Some(timeout) => barrier.wait_timeout(timeout).ok(),
            None => barrier.wait().ok(),
        };
        let Some(result) = arrived else {
            return false;
        };

        if result.is_leader() {
            leaders[iteration].fetch_add(1, Ordering::AcqRel);
        }

        // Every party of round `n` has bumped its leader count before any
        // of them can complete round `n + 1`.
        if iteration > 0 && leaders[iteration - 1].load(Ordering::Acquire) != 1 {
            return false;
        }

        result.generation() == iteration as u64
    })
}

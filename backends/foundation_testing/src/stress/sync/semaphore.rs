//! `Semaphore` stress tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use foundation_sync::Semaphore;

use crate::stress::{StressConfig, StressHarness, StressResult};

/// Has every thread repeatedly check a resource out of a pool of
/// `permits`.
///
/// An iteration fails if acquiring timed out or if, while holding the
/// permit, the thread saw more than `permits` holders.
///
/// # Examples
///
/// ```
/// use foundation_testing::stress::{StressConfig, sync::run_semaphore_pool_stress};
///
/// let config = StressConfig::new().threads(8).iterations(200);
/// let result = run_semaphore_pool_stress(config, 3);
///
/// assert!(result.is_clean());
/// ```
#[must_use]
pub fn run_semaphore_pool_stress(config: StressConfig, permits: usize) -> StressResult {
    let pool = Arc::new(Semaphore::new(permits));
    let holders = Arc::new(AtomicUsize::new(0));
    let timeout = config.get_op_timeout();

    StressHarness::new(config).run(move |_thread_id, _iteration| {
        let permit = match timeout {
            Some(timeout) => match pool.acquire_timeout(timeout) {
                Ok(permit) => permit,
                Err(_) => return false,
            },
            None => pool.acquire(),
        };

        let inside = holders.fetch_add(1, Ordering::AcqRel) + 1;
        thread::yield_now();
        holders.fetch_sub(1, Ordering::AcqRel);
        drop(permit);

        inside <= permits
    })
}

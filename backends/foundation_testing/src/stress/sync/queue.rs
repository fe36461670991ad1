//! `BoundedQueue` stress tests.

use std::sync::Arc;

use foundation_sync::{BoundedQueue, TryGetError};

use crate::stress::{StressConfig, StressHarness, StressResult};

/// Runs producers and consumers against one small queue.
///
/// Even threads put, odd threads get, one element per iteration each, so a
/// run with an even thread count moves every produced element to a
/// consumer. With an odd count the last thread only checks that the queue
/// never reports more elements than its capacity.
///
/// A consumer that starves until the op timeout counts as a failure, so
/// pairing this with [`StressConfig::duration`] may report failures for
/// consumers whose producers were stopped first.
///
/// # Examples
///
/// ```
/// use foundation_testing::stress::{StressConfig, sync::run_queue_handoff_stress};
///
/// let config = StressConfig::new().threads(8).iterations(500);
/// let result = run_queue_handoff_stress(config, 4);
///
/// assert!(result.is_clean());
/// ```
#[must_use]
pub fn run_queue_handoff_stress(config: StressConfig, capacity: usize) -> StressResult {
    let queue = Arc::new(BoundedQueue::<u64>::new(capacity));
    let timeout = config.get_op_timeout();
    let paired = config.get_thread_count() & !1;

    StressHarness::new(config).run(move |thread_id, iteration| {
        if thread_id >= paired {
            return queue.len() <= queue.capacity();
        }

        if thread_id % 2 == 0 {
            let item = ((thread_id as u64) << 32) | iteration as u64;
            match timeout {
                Some(timeout) => queue.put_timeout(item, timeout).is_ok(),
                None => queue.put(item).is_ok(),
            }
        } else {
            match timeout {
                Some(timeout) => queue.get_timeout(timeout).is_ok(),
                None => queue.get().is_ok(),
            }
        }
    })
}

/// Hammers a queue with non-blocking calls only.
///
/// Every thread alternates `try_put` and `try_get`. `Full` and
/// `WouldBlock` are expected outcomes; an iteration fails if the queue
/// reports a closed state it never entered or more elements than it can
/// hold.
#[must_use]
pub fn run_queue_try_ops_stress(config: StressConfig, capacity: usize) -> StressResult {
    let queue = Arc::new(BoundedQueue::<usize>::new(capacity));

    StressHarness::new(config).run(move |thread_id, iteration| {
        let in_bounds = if iteration % 2 == 0 {
            match queue.try_put(thread_id) {
                Ok(()) => true,
                Err(err) => err.is_full(),
            }
        } else {
            match queue.try_get() {
                Ok(_) | Err(TryGetError::WouldBlock) => true,
                Err(TryGetError::Empty) => false,
            }
        };

        in_bounds && queue.len() <= capacity
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    #[test]
    #[ntest::timeout(20000)]
    fn test_handoff_moves_every_element() {
        let config = StressConfig::new()
            .threads(6)
            .iterations(300)
            .op_timeout(Duration::from_secs(5));
        let result = run_queue_handoff_stress(config, 2);

        assert!(result.is_clean(), "{result:?}");
        assert_eq!(result.successes, 1800);
    }

    #[test]
    #[ntest::timeout(20000)]
    fn test_handoff_odd_thread_only_observes() {
        let result = run_queue_handoff_stress(StressConfig::new().threads(3).iterations(100), 1);

        assert!(result.is_clean(), "{result:?}");
    }

    #[test]
    #[ntest::timeout(20000)]
    fn test_try_ops_stay_within_capacity() {
        let result = run_queue_try_ops_stress(StressConfig::new().threads(8).iterations(2000), 3);

        assert!(result.is_clean(), "{result:?}");
    }
}

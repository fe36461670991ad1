//! Lock and condition variable plumbing shared by every primitive.
//!
//! The primitives run on the standard library's `Mutex`/`Condvar`, exposed
//! here under the `CondVar`/`CondVarMutex` names used across the foundation
//! crates. Poisoned guards are recovered rather than propagated: the only
//! code that can panic while a guard is held is an invariant assertion, and
//! that panic already reached the offending thread.

use std::time::{Duration, Instant};

pub use std::sync::{Condvar as CondVar, Mutex as CondVarMutex, MutexGuard as CondVarMutexGuard};

/// Acquires `mutex`, recovering the guard if a previous holder panicked.
#[inline]
pub(crate) fn lock<T>(mutex: &CondVarMutex<T>) -> CondVarMutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(e) => e.into_inner(),
    }
}

/// Releases `guard`, sleeps on `condvar` and re-acquires the lock.
///
/// Callers must re-check their predicate afterwards; the wakeup may be
/// spurious.
#[inline]
pub(crate) fn wait<'a, T>(
    condvar: &CondVar,
    guard: CondVarMutexGuard<'a, T>,
) -> CondVarMutexGuard<'a, T> {
    match condvar.wait(guard) {
        Ok(guard) => guard,
        Err(e) => e.into_inner(),
    }
}

/// Like [`wait`] but gives up once `deadline` has passed.
///
/// Returns the re-acquired guard and whether the deadline had already expired
/// when the call returned. An expired deadline does not mean the predicate is
/// false: callers check the predicate first and only then the flag.
pub(crate) fn wait_until<'a, T>(
    condvar: &CondVar,
    guard: CondVarMutexGuard<'a, T>,
    deadline: &Deadline,
) -> (CondVarMutexGuard<'a, T>, bool) {
    let Some(remaining) = deadline.remaining() else {
        return (guard, true);
    };

    let guard = match condvar.wait_timeout(guard, remaining) {
        Ok((guard, _)) => guard,
        Err(e) => e.into_inner().0,
    };

    (guard, deadline.has_expired())
}

/// A point in time after which a bounded wait gives up.
///
/// Durations too large to be represented as an `Instant` behave as an
/// unbounded wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    #[must_use]
    pub(crate) fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
        }
    }

    #[must_use]
    pub(crate) fn has_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Time left before expiry, `None` once expired.
    #[must_use]
    pub(crate) fn remaining(&self) -> Option<Duration> {
        match self.at {
            // Far enough out that a day-long slice is as good as forever;
            // the caller loops and asks again.
            None => Some(Duration::from_secs(86_400)),
            Some(at) => {
                let remaining = at.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    None
                } else {
                    Some(remaining)
                }
            }
        }
    }
}

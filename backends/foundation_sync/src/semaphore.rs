//! Counting semaphore with RAII permits.
//!
//! Gates access to a pool of interchangeable resources: at most `permits`
//! holders at once, everybody else blocks in `acquire`.

use core::fmt;
use core::time::Duration;

use crate::errors::TryAcquireError;
use crate::primitives::{lock, wait, wait_until, CondVar, CondVarMutex, Deadline};

/// A counting semaphore.
///
/// Share it by reference or through an `Arc`; permits borrow the semaphore
/// they came from.
///
/// # Examples
///
/// ```
/// use foundation_sync::Semaphore;
///
/// let pool = Semaphore::new(2);
///
/// let first = pool.acquire();
/// let second = pool.try_acquire().unwrap();
/// assert!(pool.try_acquire().is_err());
///
/// drop(first);
/// assert_eq!(pool.available_permits(), 1);
/// # drop(second);
/// ```
pub struct Semaphore {
    permits: CondVarMutex<usize>,
    condvar: CondVar,
}

impl Semaphore {
    #[must_use]
    pub const fn new(permits: usize) -> Self {
        Self {
            permits: CondVarMutex::new(permits),
            condvar: CondVar::new(),
        }
    }

    /// Takes one permit, blocking until one is available.
    pub fn acquire(&self) -> SemaphorePermit<'_> {
        let mut permits = lock(&self.permits);
        while *permits == 0 {
            permits = wait(&self.condvar, permits);
        }
        *permits -= 1;

        SemaphorePermit { semaphore: self }
    }

    /// Takes one permit if one is available right now.
    ///
    /// # Errors
    ///
    /// Returns [`TryAcquireError::NoPermits`] if all permits are held.
    pub fn try_acquire(&self) -> Result<SemaphorePermit<'_>, TryAcquireError> {
        let mut permits = lock(&self.permits);
        if *permits == 0 {
            return Err(TryAcquireError::NoPermits);
        }
        *permits -= 1;

        Ok(SemaphorePermit { semaphore: self })
    }

    /// Like [`Self::acquire`] but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TryAcquireError::NoPermits`] if no permit became available
    /// in time. Nothing is taken in that case.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<SemaphorePermit<'_>, TryAcquireError> {
        let deadline = Deadline::after(timeout);
        let mut permits = lock(&self.permits);

        while *permits == 0 {
            let (guard, timed_out) = wait_until(&self.condvar, permits, &deadline);
            permits = guard;

            if timed_out && *permits == 0 {
                ewe_logs::debug!("semaphore acquire timed out after {:?}", timeout);
                return Err(TryAcquireError::NoPermits);
            }
        }
        *permits -= 1;

        Ok(SemaphorePermit { semaphore: self })
    }

    /// Adds `n` permits and wakes up to `n` blocked acquirers.
    ///
    /// # Panics
    ///
    /// Panics if the permit count would overflow `usize`.
    pub fn add_permits(&self, n: usize) {
        if n == 0 {
            return;
        }

        let mut permits = lock(&self.permits);
        *permits = permits
            .checked_add(n)
            .unwrap_or_else(|| panic!("semaphore permit count overflow adding {n}"));
        drop(permits);

        if n == 1 {
            self.condvar.notify_one();
        } else {
            self.condvar.notify_all();
        }
    }

    /// Permits not currently held. Advisory under concurrent use.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        *lock(&self.permits)
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semaphore")
            .field("available_permits", &self.available_permits())
            .finish()
    }
}

/// A held permit. Dropping it hands the permit back.
#[must_use = "the permit is released as soon as it is dropped"]
pub struct SemaphorePermit<'a> {
    semaphore: &'a Semaphore,
}

impl SemaphorePermit<'_> {
    /// Consumes the permit without handing it back, shrinking the pool.
    pub fn forget(self) {
        core::mem::forget(self);
    }
}

impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        self.semaphore.add_permits(1);
    }
}

impl fmt::Debug for SemaphorePermit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemaphorePermit").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    /// WHY: Validates permit accounting
    /// WHAT: Acquiring and dropping permits moves the available count
    #[test]
    fn test_permit_accounting() {
        let semaphore = Semaphore::new(2);
        let a = semaphore.acquire();
        assert_eq!(semaphore.available_permits(), 1);
        let b = semaphore.acquire();
        assert_eq!(semaphore.try_acquire().unwrap_err(), TryAcquireError::NoPermits);

        drop(a);
        assert_eq!(semaphore.available_permits(), 1);
        b.forget();
        assert_eq!(semaphore.available_permits(), 1);

        semaphore.add_permits(3);
        assert_eq!(semaphore.available_permits(), 4);
    }

    /// WHY: A timed-out acquire must not consume a permit
    /// WHAT: `acquire_timeout` on an exhausted semaphore fails and leaves the count at 0
    #[test]
    #[ntest::timeout(5000)]
    fn test_acquire_timeout() {
        let semaphore = Semaphore::new(1);
        let held = semaphore.acquire();

        assert!(semaphore.acquire_timeout(Duration::from_millis(20)).is_err());
        assert_eq!(semaphore.available_permits(), 0);

        drop(held);
        assert!(semaphore.acquire_timeout(Duration::from_millis(20)).is_ok());
        assert_eq!(semaphore.available_permits(), 1);
    }

    /// WHY: Validates the pool bound under contention
    /// WHAT: 10 clients sharing 3 permits never exceed 3 concurrent holders
    #[test]
    #[ntest::timeout(10000)]
    fn test_never_more_than_n_holders() {
        let semaphore = Arc::new(Semaphore::new(3));
        let holders = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let clients: Vec<_> = (0..10)
            .map(|_| {
                let semaphore = Arc::clone(&semaphore);
                let holders = Arc::clone(&holders);
                let peak = Arc::clone(&peak);
                thread::spawn(move || {
                    for _ in 0..20 {
                        let _permit = semaphore.acquire();
                        let now = holders.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        thread::yield_now();
                        holders.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for client in clients {
            client.join().unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(semaphore.available_permits(), 3);
    }
}

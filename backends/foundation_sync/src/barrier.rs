//! Reusable cyclic barrier with generation tracking.
//!
//! A barrier enables a fixed number of threads to meet at a rendezvous
//! point, round after round. Rounds end either by release (the last party
//! arrived) or by breakage (`reset`, or a participant timing out).

use core::fmt;
use core::time::Duration;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{BarrierTimeoutError, Broken, SetupError};
use crate::primitives::{lock, wait, wait_until, CondVar, CondVarMutex, Deadline};

/// A barrier for `parties` threads that can be reused once every party has
/// passed.
///
/// Cloning a `CyclicBarrier` yields another handle to the same barrier.
///
/// # Examples
///
/// ```
/// use foundation_sync::CyclicBarrier;
/// use std::thread;
///
/// let barrier = CyclicBarrier::new(3);
/// let mut handles = vec![];
///
/// for _ in 0..3 {
///     let barrier = barrier.clone();
///     handles.push(thread::spawn(move || barrier.wait().unwrap()));
/// }
///
/// let leaders = handles
///     .into_iter()
///     .map(|h| h.join().unwrap())
///     .filter(|result| result.is_leader())
///     .count();
///
/// assert_eq!(leaders, 1);
/// assert_eq!(barrier.generation(), 1);
/// ```
pub struct CyclicBarrier {
    inner: Arc<Inner>,
}

struct Inner {
    state: CondVarMutex<BarrierState>,
    condvar: CondVar,
    parties: usize,
}

struct BarrierState {
    count: usize,
    generation: Arc<Generation>,
}

/// One round of the barrier.
///
/// Waiters hold on to the round they arrived in, so whichever way it ends
/// they read the outcome from their own round, not from whatever round is
/// current by the time they are scheduled again.
struct Generation {
    id: u64,
    /// Written only while holding the barrier lock.
    broken: AtomicBool,
}

impl Generation {
    fn new(id: u64) -> Arc<Self> {
        Arc::new(Self {
            id,
            broken: AtomicBool::new(false),
        })
    }

    fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Acquire)
    }

    fn mark_broken(&self) {
        self.broken.store(true, Ordering::Release);
    }
}

/// Returned from a successful [`CyclicBarrier::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierWaitResult {
    index: usize,
    generation: u64,
    parties: usize,
}

impl BarrierWaitResult {
    /// Arrival order within the round: 0 for the first party, `parties - 1`
    /// for the one that released the round.
    #[inline]
    #[must_use]
    pub fn arrival_index(&self) -> usize {
        self.index
    }

    /// Identifier of the round this party completed.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` for exactly one party per round, the last to arrive.
    #[inline]
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.index + 1 == self.parties
    }
}

enum Outcome {
    Released,
    Broken,
    TimedOut,
}

impl CyclicBarrier {
    /// Creates a barrier that releases once `parties` threads have called
    /// [`Self::wait`].
    ///
    /// # Panics
    ///
    /// Panics if `parties` is 0. Use [`Self::try_new`] to get an error
    /// instead.
    #[must_use]
    pub fn new(parties: usize) -> Self {
        match Self::try_new(parties) {
            Ok(barrier) => barrier,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a barrier for `parties` threads.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::ZeroParties`] if `parties` is 0.
    pub fn try_new(parties: usize) -> Result<Self, SetupError> {
        if parties == 0 {
            return Err(SetupError::ZeroParties);
        }

        Ok(Self {
            inner: Arc::new(Inner {
                state: CondVarMutex::new(BarrierState {
                    count: 0,
                    generation: Generation::new(0),
                }),
                condvar: CondVar::new(),
                parties,
            }),
        })
    }

    /// Blocks until all parties have called `wait` for the current round.
    ///
    /// The last party to arrive does not block; it releases every waiter of
    /// the round and starts the next one.
    ///
    /// # Errors
    ///
    /// Returns [`Broken`] if the barrier was broken when the caller arrived
    /// or the round was aborted while it waited.
    pub fn wait(&self) -> Result<BarrierWaitResult, Broken> {
        match self.arrive(None) {
            Ok(result) => Ok(result),
            Err(_) => Err(Broken),
        }
    }

    /// Like [`Self::wait`] but gives up after `timeout`.
    ///
    /// A caller that gives up breaks the round: it fails with
    /// [`BarrierTimeoutError::Timeout`], every other waiter of the round
    /// fails with [`BarrierTimeoutError::Broken`], and the barrier stays
    /// broken until [`Self::reset`]. If the round is released before the
    /// caller notices its deadline, the call succeeds.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<BarrierWaitResult, BarrierTimeoutError> {
        self.arrive(Some(Deadline::after(timeout)))
    }

    /// Aborts the current round and starts a fresh, unbroken one.
    ///
    /// Parties already waiting wake up with [`Broken`]. The arrival count
    /// goes back to 0 and the generation advances.
    pub fn reset(&self) {
        let mut state = lock(&self.inner.state);

        let aborted = state.count;
        if aborted > 0 {
            state.generation.mark_broken();
        }

        let next = state.generation.id + 1;
        state.generation = Generation::new(next);
        state.count = 0;

        ewe_logs::info!(
            "barrier reset into generation {}, {} waiting parties aborted",
            next,
            aborted
        );

        self.inner.condvar.notify_all();
    }

    /// Number of parties required per round.
    #[must_use]
    pub fn parties(&self) -> usize {
        self.inner.parties
    }

    /// Identifier of the current round. Advisory under concurrent use.
    #[must_use]
    pub fn generation(&self) -> u64 {
        lock(&self.inner.state).generation.id
    }

    /// Number of parties blocked in the current round. Advisory.
    #[must_use]
    pub fn n_waiting(&self) -> usize {
        lock(&self.inner.state).count
    }

    /// Whether the current round is broken and awaiting [`Self::reset`].
    #[must_use]
    pub fn is_broken(&self) -> bool {
        lock(&self.inner.state).generation.is_broken()
    }

    fn arrive(&self, deadline: Option<Deadline>) -> Result<BarrierWaitResult, BarrierTimeoutError> {
        let parties = self.inner.parties;
        let mut state = lock(&self.inner.state);

        if state.generation.is_broken() {
            return Err(BarrierTimeoutError::Broken);
        }

        let index = state.count;
        state.count += 1;
        assert!(
            state.count <= parties,
            "barrier count {} exceeds parties {}",
            state.count,
            parties
        );

        let generation = Arc::clone(&state.generation);

        if state.count == parties {
            // Release while still holding the lock so no party can observe
            // the old round after another has seen the new one.
            state.count = 0;
            state.generation = Generation::new(generation.id + 1);
            self.inner.condvar.notify_all();
            drop(state);

            ewe_logs::debug!("barrier generation {} released", generation.id);

            return Ok(BarrierWaitResult {
                index,
                generation: generation.id,
                parties,
            });
        }

        let outcome = loop {
            if generation.is_broken() {
                break Outcome::Broken;
            }
            if !Arc::ptr_eq(&generation, &state.generation) {
                break Outcome::Released;
            }

            match deadline {
                None => state = wait(&self.inner.condvar, state),
                Some(ref deadline) => {
                    let (guard, timed_out) = wait_until(&self.inner.condvar, state, deadline);
                    state = guard;

                    let still_pending = Arc::ptr_eq(&generation, &state.generation)
                        && !generation.is_broken();
                    if timed_out && still_pending {
                        generation.mark_broken();
                        state.count = 0;
                        self.inner.condvar.notify_all();
                        break Outcome::TimedOut;
                    }
                }
            }
        };
        drop(state);

        match outcome {
            Outcome::Released => Ok(BarrierWaitResult {
                index,
                generation: generation.id,
                parties,
            }),
            Outcome::Broken => {
                ewe_logs::debug!("barrier generation {} broken while waiting", generation.id);
                Err(BarrierTimeoutError::Broken)
            }
            Outcome::TimedOut => {
                ewe_logs::warn!(
                    "barrier generation {} broken by a party timing out",
                    generation.id
                );
                Err(BarrierTimeoutError::Timeout)
            }
        }
    }
}

impl Clone for CyclicBarrier {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for CyclicBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.inner.state);
        f.debug_struct("CyclicBarrier")
            .field("parties", &self.inner.parties)
            .field("count", &state.count)
            .field("generation", &state.generation.id)
            .field("broken", &state.generation.is_broken())
            .finish()
    }
}

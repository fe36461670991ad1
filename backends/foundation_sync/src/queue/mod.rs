//! Bounded blocking FIFO queue.
//!
//! Producers block while the queue is full, consumers while it is empty.
//! Closing the queue rejects further puts and lets consumers drain what is
//! left before they observe end-of-stream.

mod ring;

use core::fmt;
use core::time::Duration;
use std::sync::Arc;

use crate::errors::{
    Closed, Empty, GetTimeoutError, PutTimeoutError, SetupError, TryGetError, TryPutError,
};
use crate::primitives::{lock, wait, wait_until, CondVar, CondVarMutex, CondVarMutexGuard, Deadline};

use ring::RingBuffer;

/// A fixed-capacity FIFO channel shared by any number of producers and
/// consumers.
///
/// Cloning a `BoundedQueue` yields another handle to the same queue; the
/// storage is freed once the last handle is dropped.
///
/// # Examples
///
/// ```
/// use foundation_sync::BoundedQueue;
/// use std::thread;
///
/// let queue = BoundedQueue::new(2);
///
/// let producer = {
///     let queue = queue.clone();
///     thread::spawn(move || {
///         for i in 1..=3 {
///             queue.put(i).unwrap();
///         }
///     })
/// };
///
/// assert_eq!(queue.get(), Ok(1));
/// assert_eq!(queue.get(), Ok(2));
/// assert_eq!(queue.get(), Ok(3));
/// producer.join().unwrap();
/// ```
pub struct BoundedQueue<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    state: CondVarMutex<QueueState<T>>,
    not_empty: CondVar,
    not_full: CondVar,
    capacity: usize,
}

struct QueueState<T> {
    ring: RingBuffer<T>,
    closed: bool,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue holding at most `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. Use [`Self::try_new`] to get an error
    /// instead.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(queue) => queue,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a queue holding at most `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::ZeroCapacity`] if `capacity` is 0.
    pub fn try_new(capacity: usize) -> Result<Self, SetupError> {
        if capacity == 0 {
            return Err(SetupError::ZeroCapacity);
        }

        Ok(Self {
            inner: Arc::new(Inner {
                state: CondVarMutex::new(QueueState {
                    ring: RingBuffer::with_capacity(capacity),
                    closed: false,
                }),
                not_empty: CondVar::new(),
                not_full: CondVar::new(),
                capacity,
            }),
        })
    }

    /// Inserts `value` at the tail, blocking while the queue is full.
    ///
    /// Blocks indefinitely if the queue stays full and open and nobody
    /// calls `get`.
    ///
    /// # Errors
    ///
    /// Returns [`Closed`] holding `value` if the queue is closed, either
    /// before the call or while it was blocked. Nothing is inserted then.
    pub fn put(&self, value: T) -> Result<(), Closed<T>> {
        let mut state = lock(&self.inner.state);

        loop {
            if state.closed {
                return Err(Closed(value));
            }
            if !state.ring.is_full() {
                break;
            }
            state = wait(&self.inner.not_full, state);
        }

        self.insert(state, value);
        Ok(())
    }

    /// Inserts `value` if there is room right now.
    ///
    /// # Errors
    ///
    /// Returns [`TryPutError::Full`] or [`TryPutError::Closed`] holding
    /// `value`.
    pub fn try_put(&self, value: T) -> Result<(), TryPutError<T>> {
        let state = lock(&self.inner.state);

        if state.closed {
            return Err(TryPutError::Closed(value));
        }
        if state.ring.is_full() {
            return Err(TryPutError::Full(value));
        }

        self.insert(state, value);
        Ok(())
    }

    /// Like [`Self::put`] but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`PutTimeoutError::Timeout`] if no slot freed up in time and
    /// [`PutTimeoutError::Closed`] if the queue is closed. Both hand `value`
    /// back and neither inserts anything.
    pub fn put_timeout(&self, value: T, timeout: Duration) -> Result<(), PutTimeoutError<T>> {
        let deadline = Deadline::after(timeout);
        let mut state = lock(&self.inner.state);

        loop {
            if state.closed {
                return Err(PutTimeoutError::Closed(value));
            }
            if !state.ring.is_full() {
                break;
            }

            let (guard, timed_out) = wait_until(&self.inner.not_full, state, &deadline);
            state = guard;

            if timed_out && state.ring.is_full() && !state.closed {
                ewe_logs::debug!("bounded queue put timed out after {:?}", timeout);
                return Err(PutTimeoutError::Timeout(value));
            }
        }

        self.insert(state, value);
        Ok(())
    }

    /// Removes the element at the head, blocking while the queue is empty
    /// and open.
    ///
    /// After [`Self::close`], remaining elements keep coming out in FIFO
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`Empty`] once the queue is closed and drained.
    pub fn get(&self) -> Result<T, Empty> {
        let mut state = lock(&self.inner.state);

        loop {
            if let Some(value) = state.ring.pop_front() {
                self.release_slot(state);
                return Ok(value);
            }
            if state.closed {
                return Err(Empty);
            }
            state = wait(&self.inner.not_empty, state);
        }
    }

    /// Removes the head element if one is queued right now.
    ///
    /// # Errors
    ///
    /// Returns [`TryGetError::WouldBlock`] if the queue is empty but open,
    /// [`TryGetError::Empty`] if it is closed and drained.
    pub fn try_get(&self) -> Result<T, TryGetError> {
        let mut state = lock(&self.inner.state);

        match state.ring.pop_front() {
            Some(value) => {
                self.release_slot(state);
                Ok(value)
            }
            None if state.closed => Err(TryGetError::Empty),
            None => Err(TryGetError::WouldBlock),
        }
    }

    /// Like [`Self::get`] but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`GetTimeoutError::Timeout`] if nothing arrived in time and
    /// [`GetTimeoutError::Empty`] once the queue is closed and drained.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, GetTimeoutError> {
        let deadline = Deadline::after(timeout);
        let mut state = lock(&self.inner.state);

        loop {
            if let Some(value) = state.ring.pop_front() {
                self.release_slot(state);
                return Ok(value);
            }
            if state.closed {
                return Err(GetTimeoutError::Empty);
            }

            let (guard, timed_out) = wait_until(&self.inner.not_empty, state, &deadline);
            state = guard;

            if timed_out && state.ring.is_empty() && !state.closed {
                ewe_logs::debug!("bounded queue get timed out after {:?}", timeout);
                return Err(GetTimeoutError::Timeout);
            }
        }
    }

    /// Removes every element currently queued, in FIFO order, without
    /// blocking.
    pub fn drain(&self) -> Vec<T> {
        let mut state = lock(&self.inner.state);

        let mut drained = Vec::with_capacity(state.ring.len());
        while let Some(value) = state.ring.pop_front() {
            drained.push(value);
        }
        drop(state);

        if !drained.is_empty() {
            self.inner.not_full.notify_all();
        }
        drained
    }

    /// Closes the queue and wakes every blocked producer and consumer.
    ///
    /// Blocked and future puts fail with [`Closed`]; gets drain what is
    /// left and then fail with [`Empty`]. Returns `true` if this call
    /// closed the queue, `false` if it was already closed.
    pub fn close(&self) -> bool {
        let mut state = lock(&self.inner.state);
        if state.closed {
            return false;
        }
        state.closed = true;
        let pending = state.ring.len();
        drop(state);

        ewe_logs::info!("bounded queue closed with {} pending elements", pending);

        self.inner.not_full.notify_all();
        self.inner.not_empty.notify_all();
        true
    }

    /// Returns a blocking iterator that yields elements until the queue is
    /// closed and drained.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { queue: self }
    }

    /// Number of queued elements. Advisory under concurrent use.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner.state).ring.len()
    }

    /// Whether nothing is queued. Advisory under concurrent use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.inner.state).ring.is_empty()
    }

    /// Whether every slot is taken. Advisory under concurrent use.
    #[must_use]
    pub fn is_full(&self) -> bool {
        lock(&self.inner.state).ring.is_full()
    }

    /// Whether [`Self::close`] has been called. Once `true` it stays `true`.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        lock(&self.inner.state).closed
    }

    /// Maximum number of queued elements, fixed at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    fn insert(&self, mut state: CondVarMutexGuard<'_, QueueState<T>>, value: T) {
        state.ring.push_back(value);
        assert!(
            state.ring.len() <= self.inner.capacity,
            "bounded queue holds {} elements over capacity {}",
            state.ring.len(),
            self.inner.capacity
        );
        drop(state);

        self.inner.not_empty.notify_one();
    }

    fn release_slot(&self, state: CondVarMutexGuard<'_, QueueState<T>>) {
        drop(state);
        self.inner.not_full.notify_one();
    }
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.inner.state);
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.inner.capacity)
            .field("len", &state.ring.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// Blocking iterator over a [`BoundedQueue`], see [`BoundedQueue::iter`].
pub struct Iter<'a, T> {
    queue: &'a BoundedQueue<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.get().ok()
    }
}

impl<'a, T> IntoIterator for &'a BoundedQueue<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

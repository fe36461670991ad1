//! Error types returned by the coordination primitives.
//!
//! None of these are retried internally. Errors that reject a value hand it
//! back so the caller decides whether to retry, reroute or drop it.

use thiserror::Error;

/// Construction failures. No instance is created when one is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("bounded queue capacity must be > 0")]
    ZeroCapacity,

    #[error("barrier parties must be > 0")]
    ZeroParties,
}

/// Returned by `BoundedQueue::put` once the queue has been closed.
///
/// The value was not inserted and is carried back to the caller.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
#[error("put on a closed queue")]
pub struct Closed<T>(pub T);

impl<T> Closed<T> {
    /// Recovers the value that could not be inserted.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Debug for Closed<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Closed(..)")
    }
}

/// Returned by `BoundedQueue::get` once the queue is closed and drained.
///
/// This is end-of-stream, not a transient condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("queue is closed and drained")]
pub struct Empty;

#[derive(Clone, Copy, PartialEq, Eq, Error)]
pub enum TryPutError<T> {
    #[error("queue is full")]
    Full(T),

    #[error("put on a closed queue")]
    Closed(T),
}

impl<T> TryPutError<T> {
    /// Recovers the value that could not be inserted.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) | Self::Closed(value) => value,
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

impl<T> core::fmt::Debug for TryPutError<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
            Self::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> From<Closed<T>> for TryPutError<T> {
    fn from(value: Closed<T>) -> Self {
        Self::Closed(value.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TryGetError {
    /// Nothing queued right now but producers may still put.
    #[error("queue is empty")]
    WouldBlock,

    #[error("queue is closed and drained")]
    Empty,
}

impl From<Empty> for TryGetError {
    fn from(_: Empty) -> Self {
        Self::Empty
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Error)]
pub enum PutTimeoutError<T> {
    #[error("timed out waiting for queue capacity")]
    Timeout(T),

    #[error("put on a closed queue")]
    Closed(T),
}

impl<T> PutTimeoutError<T> {
    /// Recovers the value that could not be inserted.
    pub fn into_inner(self) -> T {
        match self {
            Self::Timeout(value) | Self::Closed(value) => value,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl<T> core::fmt::Debug for PutTimeoutError<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout(_) => f.write_str("Timeout(..)"),
            Self::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> From<Closed<T>> for PutTimeoutError<T> {
    fn from(value: Closed<T>) -> Self {
        Self::Closed(value.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GetTimeoutError {
    #[error("timed out waiting for an element")]
    Timeout,

    #[error("queue is closed and drained")]
    Empty,
}

impl GetTimeoutError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<Empty> for GetTimeoutError {
    fn from(_: Empty) -> Self {
        Self::Empty
    }
}

/// The barrier round the caller took part in was aborted, or the barrier
/// was already broken when the caller arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("barrier is broken")]
pub struct Broken;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BarrierTimeoutError {
    /// This caller gave up; its round is now broken for everyone else.
    #[error("timed out waiting at barrier")]
    Timeout,

    #[error("barrier is broken")]
    Broken,
}

impl BarrierTimeoutError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<Broken> for BarrierTimeoutError {
    fn from(_: Broken) -> Self {
        Self::Broken
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TryAcquireError {
    #[error("no semaphore permits available")]
    NoPermits,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// WHY: Rejected values must never be lost
    /// WHAT: Every value-carrying error should hand its payload back
    #[test]
    fn test_rejected_values_are_recoverable() {
        assert_eq!(Closed(1).into_inner(), 1);
        assert_eq!(TryPutError::Full(2).into_inner(), 2);
        assert_eq!(TryPutError::Closed(3).into_inner(), 3);
        assert_eq!(PutTimeoutError::Timeout(4).into_inner(), 4);
        assert_eq!(PutTimeoutError::Closed(5).into_inner(), 5);
    }

    /// WHY: Validates conversions used by the blocking-to-bounded paths
    /// WHAT: Terminal errors should map onto the matching variant
    #[test]
    fn test_conversions() {
        assert_eq!(TryGetError::from(Empty), TryGetError::Empty);
        assert_eq!(GetTimeoutError::from(Empty), GetTimeoutError::Empty);
        assert_eq!(BarrierTimeoutError::from(Broken), BarrierTimeoutError::Broken);
        assert!(TryPutError::from(Closed(9)).is_closed());
        assert!(!PutTimeoutError::from(Closed(9)).is_timeout());
    }

    /// WHY: Validates error messages for user-facing display
    /// WHAT: Display should describe the condition, Debug should not need `T: Debug`
    #[test]
    fn test_error_display() {
        struct Opaque;

        assert_eq!(Closed(Opaque).to_string(), "put on a closed queue");
        assert_eq!(format!("{:?}", TryPutError::Full(Opaque)), "Full(..)");
        assert_eq!(Empty.to_string(), "queue is closed and drained");
        assert_eq!(Broken.to_string(), "barrier is broken");
        assert!(SetupError::ZeroCapacity.to_string().contains("capacity"));
        assert!(SetupError::ZeroParties.to_string().contains("parties"));
    }
}

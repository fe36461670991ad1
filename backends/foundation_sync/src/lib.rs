//! Blocking coordination primitives for threads sharing memory.
//!
//! This crate provides:
//! - [`BoundedQueue`]: fixed-capacity FIFO hand-off between any number of
//!   producers and consumers, with close/drain semantics
//! - [`CyclicBarrier`]: reusable N-party rendezvous with generation tracking,
//!   reset and timeout-driven breakage
//! - [`Semaphore`]: counting semaphore handing out RAII permits
//!
//! Every primitive owns exactly one lock. Waiting is done on condition
//! variables paired with that lock and the awaited predicate is re-checked
//! after every wakeup.
//!
//! # Examples
//!
//! ```rust
//! use foundation_sync::{BoundedQueue, CyclicBarrier};
//! use std::thread;
//!
//! let queue = BoundedQueue::new(4);
//! let barrier = CyclicBarrier::new(2);
//!
//! let producer = {
//!     let queue = queue.clone();
//!     let barrier = barrier.clone();
//!     thread::spawn(move || {
//!         for i in 0..8 {
//!             queue.put(i).unwrap();
//!         }
//!         queue.close();
//!         barrier.wait().unwrap();
//!     })
//! };
//!
//! let received: Vec<i32> = queue.iter().collect();
//! barrier.wait().unwrap();
//! producer.join().unwrap();
//!
//! assert_eq!(received, (0..8).collect::<Vec<_>>());
//! ```
//!
//! The lock and condition variable plumbing stays internal; only the
//! primitives and their errors are public:
//!
//! ```compile_fail
//! use foundation_sync::primitives::CondVar;
//! ```
//!
//! # Features
//!
//! - `standard` (default): info, warning and error events through `ewe_logs`
//! - `debug_trace`: adds debug events (timeouts, releases, exhaustion)

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod barrier;
pub mod errors;
pub(crate) mod primitives;
pub mod queue;
pub mod semaphore;

pub use barrier::{BarrierWaitResult, CyclicBarrier};
pub use errors::{
    BarrierTimeoutError, Broken, Closed, Empty, GetTimeoutError, PutTimeoutError, SetupError,
    TryAcquireError, TryGetError, TryPutError,
};
pub use queue::{BoundedQueue, Iter};
pub use semaphore::{Semaphore, SemaphorePermit};

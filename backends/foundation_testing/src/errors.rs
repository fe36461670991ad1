//! Errors surfaced by the scenario drivers.

use derive_more::From;
use foundation_sync::{Broken, Closed, SetupError};

/// Result alias for scenario drivers.
pub type ScenarioResult<T> = core::result::Result<T, ScenarioError>;

/// A scenario either could not run or observed a broken invariant.
#[derive(From, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// A primitive rejected its configuration.
    #[from]
    Setup(SetupError),

    /// A barrier round was aborted while the scenario relied on it.
    #[from]
    Broken(Broken),

    /// The scenario configuration cannot run to completion.
    InvalidConfig(&'static str),

    /// A producer found the queue closed before it finished.
    QueueClosed,

    /// Fewer values came out of the queue than went in.
    Lost {
        /// Values successfully put.
        expected: usize,
        /// Values observed by consumers.
        received: usize,
    },

    /// The same item was observed by more than one get.
    Duplicated {
        /// Producer that put the item.
        producer: u64,
        /// Its sequence number.
        sequence: u64,
    },

    /// A consumer saw one producer's values out of insertion order.
    OutOfOrder {
        /// Producer whose sequence was violated.
        producer: u64,
        /// Sequence number seen first.
        previous: u64,
        /// Sequence number seen after it.
        next: u64,
    },

    /// A barrier released a party before every party had arrived.
    EarlyRelease {
        /// Round in which it happened.
        round: usize,
    },

    /// A round elected other than exactly one leader.
    LeaderCount {
        /// Round in which it happened.
        round: usize,
        /// Leaders observed.
        leaders: usize,
    },

    /// More holders than permits were inside the pool at once.
    PermitOverflow {
        /// Highest number of concurrent holders seen.
        peak: usize,
        /// Permits the pool was created with.
        permits: usize,
    },

    /// A worker thread panicked.
    WorkerPanicked,
}

impl<T> From<Closed<T>> for ScenarioError {
    fn from(_: Closed<T>) -> Self {
        Self::QueueClosed
    }
}

impl core::error::Error for ScenarioError {}

impl core::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Setup(err) => write!(f, "ScenarioError::Setup({err})"),
            Self::Broken(err) => write!(f, "ScenarioError::Broken({err})"),
            Self::InvalidConfig(reason) => write!(f, "ScenarioError::InvalidConfig({reason})"),
            Self::QueueClosed => write!(f, "ScenarioError::QueueClosed"),
            Self::Lost { expected, received } => {
                write!(f, "ScenarioError::Lost(expected {expected}, received {received})")
            }
            Self::Duplicated { producer, sequence } => {
                write!(f, "ScenarioError::Duplicated(producer {producer}, item {sequence})")
            }
            Self::OutOfOrder {
                producer,
                previous,
                next,
            } => write!(
                f,
                "ScenarioError::OutOfOrder(producer {producer}: {previous} then {next})"
            ),
            Self::EarlyRelease { round } => write!(f, "ScenarioError::EarlyRelease(round {round})"),
            Self::LeaderCount { round, leaders } => {
                write!(f, "ScenarioError::LeaderCount(round {round}: {leaders} leaders)")
            }
            Self::PermitOverflow { peak, permits } => {
                write!(f, "ScenarioError::PermitOverflow({peak} holders for {permits} permits)")
            }
            Self::WorkerPanicked => write!(f, "ScenarioError::WorkerPanicked"),
        }
    }
}

//! End-to-end scenarios built on the `foundation_sync` primitives.
//!
//! Each driver spawns its own threads, runs a classic coordination pattern
//! to completion and then checks the invariants of the primitive it used:
//! - [`run_pipeline`]: producers and consumers over a [`BoundedQueue`](foundation_sync::BoundedQueue),
//!   checking nothing is lost, duplicated or reordered per producer
//! - [`run_phased`]: workers stepping through [`CyclicBarrier`](foundation_sync::CyclicBarrier)
//!   rounds, checking no early release and one leader per round
//! - [`run_aborted_round`]: a round torn down by `reset`
//! - [`run_resource_pool`]: clients sharing a [`Semaphore`](foundation_sync::Semaphore)-gated pool

pub mod phased;
pub mod pipeline;
pub mod resource_pool;

pub use phased::{run_aborted_round, run_phased, PhasedConfig, PhasedReport};
pub use pipeline::{run_pipeline, PipelineConfig, PipelineReport};
pub use resource_pool::{run_resource_pool, PoolConfig, PoolReport};

use std::thread::JoinHandle;

use crate::errors::{ScenarioError, ScenarioResult};

/// Joins a scenario worker, folding a panic into [`ScenarioError::WorkerPanicked`].
fn join_worker<T>(handle: JoinHandle<ScenarioResult<T>>) -> ScenarioResult<T> {
    match handle.join() {
        Ok(outcome) => outcome,
        Err(_) => {
            ewe_logs::error!("scenario worker panicked");
            Err(ScenarioError::WorkerPanicked)
        }
    }
}

/// Folds worker outcomes into one, preferring the error that caused a
/// teardown over the `Broken`/`QueueClosed` fallout it inflicted on others.
fn settle<I>(outcomes: I) -> ScenarioResult<()>
where
    I: IntoIterator<Item = ScenarioResult<()>>,
{
    let mut fallout = None;
    for outcome in outcomes {
        match outcome {
            Ok(()) => {}
            Err(err @ (ScenarioError::Broken(_) | ScenarioError::QueueClosed)) => {
                fallout.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }

    match fallout {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

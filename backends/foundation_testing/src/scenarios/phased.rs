//! Workers stepping through barrier-separated phases.

use core::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use foundation_sync::{BarrierWaitResult, Broken, CyclicBarrier};

use super::{join_worker, settle};
use crate::errors::{ScenarioError, ScenarioResult};
use crate::metrics::Metrics;

/// Shape of a phased run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasedConfig {
    parties: usize,
    rounds: usize,
}

impl PhasedConfig {
    /// Defaults: 4 parties, 100 rounds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parties: 4,
            rounds: 100,
        }
    }

    /// Sets the number of worker threads, which is also the barrier size.
    #[must_use]
    pub const fn parties(mut self, parties: usize) -> Self {
        self.parties = parties;
        self
    }

    /// Sets how many rounds every worker goes through.
    #[must_use]
    pub const fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }
}

impl Default for PhasedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a phased run that kept every barrier invariant.
#[derive(Debug, Clone)]
pub struct PhasedReport {
    /// Rounds completed.
    pub rounds: usize,
    /// Barrier generation after the run.
    pub final_generation: u64,
    /// Round trips per second, one operation per party per round.
    pub metrics: Metrics,
}

/// Runs `parties` workers through `rounds` barrier rounds.
///
/// Before waiting, each worker records its arrival for the round. After
/// being released it checks that all parties had arrived and that the
/// round it completed is the one it expected. Once every worker is done
/// the driver checks that each round elected exactly one leader.
///
/// # Errors
///
/// - [`ScenarioError::Setup`] for zero parties
/// - [`ScenarioError::EarlyRelease`] if a worker left a round too soon or
///   completed the wrong generation
/// - [`ScenarioError::LeaderCount`] if a round had other than one leader
/// - [`ScenarioError::Broken`] if the barrier broke under the workers
/// - [`ScenarioError::WorkerPanicked`] if a thread panicked
pub fn run_phased(config: PhasedConfig) -> ScenarioResult<PhasedReport> {
    let parties = config.parties;
    drive_phased(config, move |_worker, round, arrived, result| {
        arrived == parties && result.generation() == round as u64
    })
}

/// Runs the phased workers, asking `round_ok(worker, round, arrived, result)`
/// after every release whether the round held up.
///
/// A worker whose round fails raises the abort flag and keeps resetting the
/// barrier until every worker has left, so no sibling stays parked on a
/// round that can no longer fill up.
fn drive_phased<C>(config: PhasedConfig, round_ok: C) -> ScenarioResult<PhasedReport>
where
    C: Fn(usize, usize, usize, &BarrierWaitResult) -> bool + Send + Sync + 'static,
{
    let barrier = CyclicBarrier::try_new(config.parties)?;
    let arrivals: Arc<Vec<AtomicUsize>> =
        Arc::new((0..config.rounds).map(|_| AtomicUsize::new(0)).collect());
    let leaders: Arc<Vec<AtomicUsize>> =
        Arc::new((0..config.rounds).map(|_| AtomicUsize::new(0)).collect());
    let aborted = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicUsize::new(0));
    let round_ok = Arc::new(round_ok);

    ewe_logs::info!(
        "phased run starting: {} parties x {} rounds",
        config.parties,
        config.rounds
    );
    let start = Instant::now();

    let workers: Vec<_> = (0..config.parties)
        .map(|worker| {
            let barrier = barrier.clone();
            let arrivals = Arc::clone(&arrivals);
            let leaders = Arc::clone(&leaders);
            let aborted = Arc::clone(&aborted);
            let finished = Arc::clone(&finished);
            let round_ok = Arc::clone(&round_ok);
            let parties = config.parties;
            let rounds = config.rounds;

            thread::spawn(move || -> ScenarioResult<()> {
                let exit_guard = ExitCounter(&finished);

                for round in 0..rounds {
                    if aborted.load(Ordering::Acquire) {
                        return Err(ScenarioError::Broken(Broken));
                    }
                    arrivals[round].fetch_add(1, Ordering::AcqRel);

                    let result = barrier.wait()?;

                    let arrived = arrivals[round].load(Ordering::Acquire);
                    if !round_ok(worker, round, arrived, &result) {
                        ewe_logs::error!("phased worker {} failed round {}", worker, round);
                        aborted.store(true, Ordering::Release);
                        drop(exit_guard);
                        while finished.load(Ordering::Acquire) < parties {
                            barrier.reset();
                            thread::sleep(Duration::from_millis(1));
                        }
                        return Err(ScenarioError::EarlyRelease { round });
                    }
                    if result.is_leader() {
                        leaders[round].fetch_add(1, Ordering::AcqRel);
                    }
                }
                Ok(())
            })
        })
        .collect();

    let outcomes: Vec<ScenarioResult<()>> = workers.into_iter().map(join_worker).collect();
    settle(outcomes)?;

    for (round, count) in leaders.iter().enumerate() {
        let elected = count.load(Ordering::Acquire);
        if elected != 1 {
            return Err(ScenarioError::LeaderCount {
                round,
                leaders: elected,
            });
        }
    }

    let metrics =
        Metrics::new(config.parties * config.rounds, start.elapsed()).with_throughput();
    ewe_logs::info!(
        "phased run finished {} rounds in {:?}",
        config.rounds,
        metrics.duration
    );

    Ok(PhasedReport {
        rounds: config.rounds,
        final_generation: barrier.generation(),
        metrics,
    })
}

/// Counts a worker as finished when it leaves, whichever way it leaves.
struct ExitCounter<'a>(&'a AtomicUsize);

impl Drop for ExitCounter<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

/// Blocks `parties - 1` workers on a barrier, resets it under them and
/// returns how many of them woke with [`Broken`].
///
/// Afterwards the barrier must be usable again: the driver finishes by
/// running one full round on the reset barrier.
///
/// # Errors
///
/// - [`ScenarioError::Setup`] for zero parties
/// - [`ScenarioError::Broken`] if the round after the reset does not release
/// - [`ScenarioError::WorkerPanicked`] if a thread panicked
pub fn run_aborted_round(parties: usize) -> ScenarioResult<usize> {
    let barrier = CyclicBarrier::try_new(parties)?;
    let blocked = parties - 1;

    let waiters: Vec<_> = (0..blocked)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || -> ScenarioResult<bool> { Ok(barrier.wait() == Err(Broken)) })
        })
        .collect();

    while barrier.n_waiting() < blocked {
        thread::sleep(Duration::from_millis(1));
    }
    barrier.reset();

    let mut aborted = 0;
    for waiter in waiters {
        if join_worker(waiter)? {
            aborted += 1;
        }
    }

    let survivors: Vec<_> = (0..parties)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || -> ScenarioResult<()> {
                barrier.wait()?;
                Ok(())
            })
        })
        .collect();
    for survivor in survivors {
        join_worker(survivor)?;
    }

    ewe_logs::info!("aborted round woke {} of {} blocked parties", aborted, blocked);
    Ok(aborted)
}

//! Producer/consumer pipeline over a bounded queue.

use std::collections::HashSet;
use std::thread;
use std::time::Instant;

use foundation_sync::BoundedQueue;

use super::{join_worker, settle};
use crate::errors::{ScenarioError, ScenarioResult};
use crate::metrics::Metrics;

/// Shape of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    producers: usize,
    consumers: usize,
    items_per_producer: usize,
    capacity: usize,
}

impl PipelineConfig {
    /// Defaults: 2 producers, 2 consumers, 1000 items each, capacity 8.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            producers: 2,
            consumers: 2,
            items_per_producer: 1000,
            capacity: 8,
        }
    }

    /// Sets the number of producer threads.
    #[must_use]
    pub const fn producers(mut self, count: usize) -> Self {
        self.producers = count;
        self
    }

    /// Sets the number of consumer threads.
    #[must_use]
    pub const fn consumers(mut self, count: usize) -> Self {
        self.consumers = count;
        self
    }

    /// Sets how many items each producer puts.
    #[must_use]
    pub const fn items_per_producer(mut self, count: usize) -> Self {
        self.items_per_producer = count;
        self
    }

    /// Sets the queue capacity.
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Items the run is expected to deliver.
    #[must_use]
    pub const fn expected_items(&self) -> usize {
        self.producers * self.items_per_producer
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a pipeline run that kept every queue invariant.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Items that made it from a producer to a consumer.
    pub delivered: usize,
    /// Items taken by each consumer, indexed by consumer.
    pub per_consumer: Vec<usize>,
    /// Throughput over the whole run, one operation per delivered item.
    pub metrics: Metrics,
}

/// Runs producers and consumers over one [`BoundedQueue`] until every
/// producer is done, then closes the queue and lets consumers drain it.
///
/// Items are `(producer, sequence)` pairs. Each consumer must see any one
/// producer's sequence numbers in increasing order, and across consumers
/// every item must show up exactly once.
///
/// # Errors
///
/// - [`ScenarioError::Setup`] for a zero capacity
/// - [`ScenarioError::InvalidConfig`] when items are produced but nobody consumes
/// - [`ScenarioError::OutOfOrder`], [`ScenarioError::Duplicated`] or
///   [`ScenarioError::Lost`] when the queue broke an invariant
/// - [`ScenarioError::WorkerPanicked`] if a thread panicked
pub fn run_pipeline(config: PipelineConfig) -> ScenarioResult<PipelineReport> {
    let queue = BoundedQueue::<(u64, u64)>::try_new(config.capacity)?;
    if config.consumers == 0 && config.expected_items() > 0 {
        return Err(ScenarioError::InvalidConfig(
            "pipeline has items to deliver but no consumers",
        ));
    }

    ewe_logs::info!(
        "pipeline starting: {} producers x {} items, {} consumers, capacity {}",
        config.producers,
        config.items_per_producer,
        config.consumers,
        config.capacity
    );
    let start = Instant::now();

    let consumers: Vec<_> = (0..config.consumers)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || consume(&queue))
        })
        .collect();

    let producers: Vec<_> = (0..config.producers as u64)
        .map(|producer| {
            let queue = queue.clone();
            let items = config.items_per_producer as u64;
            thread::spawn(move || -> ScenarioResult<()> {
                for sequence in 0..items {
                    queue.put((producer, sequence))?;
                }
                Ok(())
            })
        })
        .collect();

    // Close only after every producer finished, even if one failed, so
    // consumers always terminate.
    let produced: Vec<ScenarioResult<()>> = producers.into_iter().map(join_worker).collect();
    queue.close();
    let consumed: Vec<ScenarioResult<Vec<(u64, u64)>>> =
        consumers.into_iter().map(join_worker).collect();

    let consumer_outcomes = consumed
        .iter()
        .map(|outcome| outcome.as_ref().map(|_| ()).map_err(Clone::clone));
    settle(consumer_outcomes.chain(produced))?;

    let mut seen = HashSet::with_capacity(config.expected_items());
    let mut per_consumer = Vec::with_capacity(consumed.len());
    for items in consumed.into_iter().flatten() {
        per_consumer.push(items.len());
        for (producer, sequence) in items {
            if !seen.insert((producer, sequence)) {
                return Err(ScenarioError::Duplicated { producer, sequence });
            }
        }
    }

    let delivered = seen.len();
    if delivered != config.expected_items() {
        return Err(ScenarioError::Lost {
            expected: config.expected_items(),
            received: delivered,
        });
    }

    let metrics = Metrics::new(delivered, start.elapsed()).with_throughput();
    ewe_logs::info!(
        "pipeline delivered {} items at {:.0} items/sec",
        delivered,
        metrics.throughput
    );

    Ok(PipelineReport {
        delivered,
        per_consumer,
        metrics,
    })
}

/// Drains the queue until it is closed, checking per-producer order.
///
/// On an order violation the queue is closed before returning, so blocked
/// producers fail with `Closed` rather than waiting for a consumer that is
/// gone.
fn consume(queue: &BoundedQueue<(u64, u64)>) -> ScenarioResult<Vec<(u64, u64)>> {
    let mut last_seen: Vec<Option<u64>> = Vec::new();
    let mut taken = Vec::new();

    for (producer, sequence) in queue {
        let slot = usize::try_from(producer).unwrap_or(usize::MAX);
        if slot >= last_seen.len() {
            last_seen.resize(slot.saturating_add(1), None);
        }

        if let Some(previous) = last_seen[slot] {
            if sequence <= previous {
                // Nobody drains behind us; fail the producers instead of
                // leaving them parked on a full queue.
                queue.close();
                return Err(ScenarioError::OutOfOrder {
                    producer,
                    previous,
                    next: sequence,
                });
            }
        }
        last_seen[slot] = Some(sequence);
        taken.push((producer, sequence));
    }

    Ok(taken)
}

//! Clients sharing a fixed pool of resources behind a semaphore.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use foundation_sync::Semaphore;

use super::join_worker;
use crate::errors::{ScenarioError, ScenarioResult};
use crate::metrics::Metrics;

/// Shape of a resource pool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    permits: usize,
    clients: usize,
    checkouts_per_client: usize,
}

impl PoolConfig {
    /// Defaults: 3 permits, 10 clients, 100 checkouts each.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            permits: 3,
            clients: 10,
            checkouts_per_client: 100,
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub const fn permits(mut self, permits: usize) -> Self {
        self.permits = permits;
        self
    }

    /// Sets the number of client threads.
    #[must_use]
    pub const fn clients(mut self, clients: usize) -> Self {
        self.clients = clients;
        self
    }

    /// Sets how many times each client checks a resource out.
    #[must_use]
    pub const fn checkouts_per_client(mut self, count: usize) -> Self {
        self.checkouts_per_client = count;
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a resource pool run.
#[derive(Debug, Clone)]
pub struct PoolReport {
    /// Most clients seen holding a resource at the same time.
    pub peak: usize,
    /// Checkouts completed.
    pub checkouts: usize,
    /// Checkouts per second.
    pub metrics: Metrics,
}

/// Runs clients that repeatedly take a permit, hold it briefly and give it
/// back, tracking how many hold one at once.
///
/// # Errors
///
/// - [`ScenarioError::InvalidConfig`] for an empty pool with clients
/// - [`ScenarioError::PermitOverflow`] if more clients than permits were
///   inside at once, or permits were not all returned
/// - [`ScenarioError::WorkerPanicked`] if a thread panicked
pub fn run_resource_pool(config: PoolConfig) -> ScenarioResult<PoolReport> {
    if config.permits == 0 && config.clients > 0 && config.checkouts_per_client > 0 {
        return Err(ScenarioError::InvalidConfig(
            "resource pool has clients but no permits",
        ));
    }

    let pool = Arc::new(Semaphore::new(config.permits));
    let holders = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let clients: Vec<_> = (0..config.clients)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let holders = Arc::clone(&holders);
            let peak = Arc::clone(&peak);
            let checkouts = config.checkouts_per_client;

            thread::spawn(move || -> ScenarioResult<()> {
                for _ in 0..checkouts {
                    let permit = pool.acquire();
                    let inside = holders.fetch_add(1, Ordering::AcqRel) + 1;
                    peak.fetch_max(inside, Ordering::AcqRel);
                    thread::yield_now();
                    holders.fetch_sub(1, Ordering::AcqRel);
                    drop(permit);
                }
                Ok(())
            })
        })
        .collect();

    let outcomes: Vec<ScenarioResult<()>> = clients.into_iter().map(join_worker).collect();
    for outcome in outcomes {
        outcome?;
    }

    let peak = peak.load(Ordering::Acquire);
    if peak > config.permits || pool.available_permits() != config.permits {
        return Err(ScenarioError::PermitOverflow {
            peak,
            permits: config.permits,
        });
    }

    let checkouts = config.clients * config.checkouts_per_client;
    let metrics = Metrics::new(checkouts, start.elapsed()).with_throughput();
    ewe_logs::info!(
        "resource pool served {} checkouts, peak {} of {} permits",
        checkouts,
        peak,
        config.permits
    );

    Ok(PoolReport {
        peak,
        checkouts,
        metrics,
    })
}

//! Iterative grid smoothing split across threads, two barrier phases per
//! step: compute into a scratch grid, then publish it.
//!
//! Run with:
//! ```bash
//! cargo run -p foundation_sync --example grid_phases
//! ```

use foundation_sync::CyclicBarrier;
use std::sync::{Arc, RwLock};
use std::thread;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const GRID_SIZE: usize = 64;
const NUM_THREADS: usize = 4;
const ITERATIONS: usize = 10;

type Grid = Vec<Vec<f64>>;

fn neighbourhood_mean(grid: &Grid, i: usize, j: usize) -> f64 {
    let mut sum = 0.0;
    let mut count = 0.0;

    for ni in i.saturating_sub(1)..=(i + 1).min(GRID_SIZE - 1) {
        for nj in j.saturating_sub(1)..=(j + 1).min(GRID_SIZE - 1) {
            sum += grid[ni][nj];
            count += 1.0;
        }
    }

    sum / count
}

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    #[allow(clippy::cast_precision_loss)]
    let initial: Grid = (0..GRID_SIZE)
        .map(|i| (0..GRID_SIZE).map(|j| ((i * 31 + j * 17) % 100) as f64).collect())
        .collect();

    let grid = Arc::new(RwLock::new(initial));
    let scratch = Arc::new(RwLock::new(vec![vec![0.0; GRID_SIZE]; GRID_SIZE]));
    let barrier = CyclicBarrier::new(NUM_THREADS);

    let rows_per_thread = GRID_SIZE / NUM_THREADS;

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|id| {
            let grid = Arc::clone(&grid);
            let scratch = Arc::clone(&scratch);
            let barrier = barrier.clone();

            thread::spawn(move || {
                let rows = id * rows_per_thread..(id + 1) * rows_per_thread;

                for step in 0..ITERATIONS {
                    {
                        let grid = grid.read().expect("grid lock poisoned");
                        let mut scratch = scratch.write().expect("scratch lock poisoned");
                        for i in rows.clone() {
                            for j in 0..GRID_SIZE {
                                scratch[i][j] = neighbourhood_mean(&grid, i, j);
                            }
                        }
                    }

                    barrier.wait().expect("barrier broken during compute phase");

                    {
                        let mut grid = grid.write().expect("grid lock poisoned");
                        let scratch = scratch.read().expect("scratch lock poisoned");
                        for i in rows.clone() {
                            grid[i].copy_from_slice(&scratch[i]);
                        }
                    }

                    let result = barrier.wait().expect("barrier broken during publish phase");
                    if result.is_leader() {
                        tracing::info!(step = step + 1, generation = result.generation(), "step complete");
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    tracing::info!(generation = barrier.generation(), "simulation complete");
}

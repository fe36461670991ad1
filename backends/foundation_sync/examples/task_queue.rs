//! Worker pool draining a bounded task queue with a clean shutdown.
//!
//! Run with:
//! ```bash
//! cargo run -p foundation_sync --example task_queue
//! ```

use foundation_sync::BoundedQueue;
use std::thread;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const NUM_WORKERS: usize = 3;
const NUM_TASKS: u32 = 10;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let tasks = BoundedQueue::new(4);

    let workers: Vec<_> = (1..=NUM_WORKERS)
        .map(|id| {
            let tasks = tasks.clone();
            thread::spawn(move || {
                let mut handled = 0;
                for task in &tasks {
                    tracing::info!(worker = id, task, "processing task");
                    thread::sleep(Duration::from_millis(50));
                    handled += 1;
                }
                tracing::info!(worker = id, handled, "worker stopping");
                handled
            })
        })
        .collect();

    for task in 1..=NUM_TASKS {
        tasks.put(task).expect("queue closed before shutdown");
        thread::sleep(Duration::from_millis(20));
    }

    tracing::info!("all tasks submitted, shutting down");
    tasks.close();

    let handled: usize = workers
        .into_iter()
        .map(|w| w.join().expect("worker panicked"))
        .sum();

    tracing::info!(handled, "all workers stopped");
    assert_eq!(handled, NUM_TASKS as usize);
}

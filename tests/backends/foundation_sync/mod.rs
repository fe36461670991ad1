mod barrier_tests;
mod queue_tests;
mod semaphore_tests;
mod shutdown_tests;

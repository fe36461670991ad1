use foundation_sync::Semaphore;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// WHY: An exhausted semaphore parks acquirers until a permit is dropped
#[test]
#[ntest::timeout(10000)]
fn test_acquire_waits_for_release() {
    let pool = Arc::new(Semaphore::new(1));
    let held = pool.acquire();

    let waiter = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            let _permit = pool.acquire();
        })
    };

    thread::sleep(Duration::from_millis(20));
    assert!(!waiter.is_finished());

    drop(held);
    waiter.join().unwrap();
    assert_eq!(pool.available_permits(), 1);
}

/// WHY: Adding several permits wakes that many blocked acquirers
#[test]
#[ntest::timeout(10000)]
fn test_add_permits_wakes_all_waiters() {
    let pool = Arc::new(Semaphore::new(0));

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || pool.acquire().forget())
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    pool.add_permits(3);

    for waiter in waiters {
        waiter.join().unwrap();
    }
    assert_eq!(pool.available_permits(), 0);
}

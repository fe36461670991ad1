use foundation_sync::{BoundedQueue, Broken, CyclicBarrier, Empty};
use serial_test::serial;
use std::thread;
use std::time::Duration;
use tracing_test::traced_test;

/// WHY: Closing wakes every parked consumer with end-of-stream
#[test]
#[traced_test]
#[serial]
fn test_close_wakes_parked_consumers() {
    let queue: BoundedQueue<u8> = BoundedQueue::new(4);

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || queue.get())
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    assert!(queue.close());
    assert!(!queue.close());

    for consumer in consumers {
        assert_eq!(consumer.join().unwrap(), Err(Empty));
    }
    assert!(logs_contain("bounded queue closed with 0 pending elements"));
}

/// WHY: Elements queued before close are still delivered, then gets end
#[test]
#[traced_test]
#[serial]
fn test_close_keeps_pending_elements() {
    let queue = BoundedQueue::new(3);
    queue.put('a').unwrap();
    queue.put('b').unwrap();
    queue.close();

    assert!(queue.put('c').is_err());
    assert_eq!(queue.iter().collect::<String>(), "ab");
    assert_eq!(queue.get(), Err(Empty));
    assert!(logs_contain("bounded queue closed with 2 pending elements"));
}

/// WHY: Reset aborts the parked parties of the current round
#[test]
#[traced_test]
#[serial]
fn test_reset_aborts_parked_parties() {
    let barrier = CyclicBarrier::new(3);

    let parked: Vec<_> = (0..2)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || barrier.wait())
        })
        .collect();

    while barrier.n_waiting() < 2 {
        thread::sleep(Duration::from_millis(1));
    }
    barrier.reset();

    for party in parked {
        assert_eq!(party.join().unwrap(), Err(Broken));
    }
    assert!(!barrier.is_broken());
    assert!(logs_contain("2 waiting parties aborted"));
}
